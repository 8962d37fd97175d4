#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident CSV loading and cleaning.
//!
//! A [`DatasetDefinition`] describes where each required field lives in a
//! source export and how its timestamps are formatted. The loader reads
//! the CSV, normalizes headers, drops rows with unparseable dates or
//! missing coordinates, and projects what is left onto
//! [`crime_viz_crime_models::IncidentRecord`].

pub mod definition;
pub mod loader;
pub mod parsing;
pub mod progress;

pub use definition::DatasetDefinition;
pub use loader::{Dataset, LoadReport, load_incidents, load_incidents_from_reader};

/// Errors that can occur while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file open/read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Dataset definition TOML failed to parse.
    #[error("Dataset definition error: {0}")]
    Definition(#[from] toml::de::Error),

    /// A required column is absent from the header row.
    #[error("Missing required column '{column}' (available: {available})")]
    MissingColumn {
        /// Normalized column name that was expected.
        column: String,
        /// Comma-separated normalized header names that were found.
        available: String,
    },

    /// More than one header resolves to a required column.
    #[error("Column '{column}' appears more than once after header normalization")]
    DuplicateColumn {
        /// Normalized (and renamed) column name.
        column: String,
    },
}
