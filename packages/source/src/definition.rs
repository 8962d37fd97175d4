//! Config-driven dataset definition.
//!
//! [`DatasetDefinition`] captures everything specific to one source export
//! (column synonyms, field locations, timestamp format) so the loader stays
//! generic. The Chicago definition is compiled into the binary; others can
//! be loaded from disk.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::SourceError;

/// Embedded Chicago dataset definition.
const CHICAGO_TOML: &str = include_str!("../datasets/chicago.toml");

/// Describes the layout of one incident export.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetDefinition {
    /// Short identifier (e.g. `"chicago"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Input path used when none is given on the command line.
    pub default_input: String,
    /// `chrono` format string every occurrence timestamp must match
    /// exactly.
    pub timestamp_format: String,
    /// Normalized header name -> replacement name.
    #[serde(default)]
    pub renames: BTreeMap<String, String>,
    /// Which (renamed, normalized) columns hold each field.
    pub fields: FieldMapping,
}

/// Column names for each projected field, after normalization and renames.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldMapping {
    /// Free-text crime category.
    pub category: String,
    /// Occurrence timestamp.
    pub occurred_at: String,
    /// Latitude.
    pub latitude: String,
    /// Longitude.
    pub longitude: String,
    /// Arrest indicator.
    pub arrest: String,
}

impl DatasetDefinition {
    /// Returns the built-in Chicago definition.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Definition`] if the embedded TOML is invalid.
    pub fn chicago() -> Result<Self, SourceError> {
        Self::from_toml(CHICAGO_TOML)
    }

    /// Parses a definition from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Definition`] if the TOML does not describe a
    /// valid definition.
    pub fn from_toml(text: &str) -> Result<Self, SourceError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a definition file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let text = std::fs::read_to_string(path)?;
        let definition = Self::from_toml(&text)?;
        log::info!(
            "Loaded dataset definition '{}' from {}",
            definition.id,
            path.display()
        );
        Ok(definition)
    }

    /// Applies the rename table to a normalized header name.
    #[must_use]
    pub fn resolve_column<'a>(&'a self, normalized: &'a str) -> &'a str {
        self.renames
            .get(normalized)
            .map_or(normalized, String::as_str)
    }
}
