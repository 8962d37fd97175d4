#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map document generation for sampled crime incidents.
//!
//! Every renderer builds a [`document::MapDocument`]: a single HTML page
//! with a Leaflet base map, the plugin assets it needs, and all point data
//! inlined as JSON. Nothing is fetched at view time besides those assets
//! and the base-map tiles.
//!
//! Element identifiers are assigned from a counter rather than randomly,
//! so identical input always yields byte-identical documents.

pub mod animated;
pub mod document;
pub mod heatmap;
pub mod legend;
pub mod markers;

use std::path::{Path, PathBuf};

use serde::Serialize;

pub use document::MapDocument;

/// File name of the color-coded marker map.
pub const OUTPUT_MARKER_MAP: &str = "colored_crime_map.html";

/// File name of the single heatmap.
pub const OUTPUT_HEATMAP: &str = "crime_heatmap.html";

/// File name of the per-category layered heatmap.
pub const OUTPUT_LAYERED_HEATMAP: &str = "crime_layers_heatmap.html";

/// File name of the animated time-slider map.
pub const OUTPUT_ANIMATED_MAP: &str = "crime_animated_map.html";

/// Chicago city-center latitude.
pub const CHICAGO_LATITUDE: f64 = 41.8781;

/// Chicago city-center longitude.
pub const CHICAGO_LONGITUDE: f64 = -87.6298;

/// Initial zoom level of every map.
pub const DEFAULT_ZOOM: u8 = 11;

/// Errors that can occur while generating map documents.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Writing the document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing inlined data failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Base-map placement shared by all renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    /// Map center latitude.
    pub center_latitude: f64,
    /// Map center longitude.
    pub center_longitude: f64,
    /// Initial zoom level.
    pub zoom: u8,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center_latitude: CHICAGO_LATITUDE,
            center_longitude: CHICAGO_LONGITUDE,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// Serializes `value` for embedding inside a `<script>` block.
///
/// JSON is valid JavaScript; the only extra care needed is that a string
/// containing `</` cannot close the surrounding script element.
///
/// # Errors
///
/// Returns [`GenerateError::Json`] if `value` cannot be serialized.
pub fn js_value<T: Serialize + ?Sized>(value: &T) -> Result<String, GenerateError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Escapes text for use inside HTML element content or attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Saves `document` as `file_name` under `dir` and returns the full path.
///
/// # Errors
///
/// Returns [`GenerateError::Io`] if the file cannot be written.
pub fn save_document(
    document: &MapDocument,
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf, GenerateError> {
    let path = dir.join(file_name);
    document.save(&path)?;
    Ok(path)
}
