//! Kernel-density heatmaps: one layer over the whole sample, or one
//! toggleable layer per [`ColorBucket`].

use crime_viz_crime_models::{BucketPartition, ColorBucket, IncidentRecord};
use serde::Serialize;

use crate::document::{MAP_VAR, TILES_VAR};
use crate::{GenerateError, MapDocument, MapSettings, js_value};

/// `Leaflet.heat` plugin script.
const LEAFLET_HEAT_JS: &str = "https://cdn.jsdelivr.net/npm/leaflet.heat@0.2.0/dist/leaflet-heat.js";

/// Heat point radius in pixels.
pub const HEAT_RADIUS: u32 = 10;

/// Heat blur in pixels.
pub const HEAT_BLUR: u32 = 15;

/// Options passed to `L.heatLayer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatSettings {
    /// Minimum layer opacity.
    pub min_opacity: f64,
    /// Zoom at which points reach full intensity.
    pub max_zoom: u8,
    /// Point radius.
    pub radius: u32,
    /// Blur amount.
    pub blur: u32,
}

impl Default for HeatSettings {
    fn default() -> Self {
        Self {
            min_opacity: 0.5,
            max_zoom: 18,
            radius: HEAT_RADIUS,
            blur: HEAT_BLUR,
        }
    }
}

/// `[latitude, longitude]` pairs for every record with finite coordinates.
#[must_use]
pub fn heat_points(records: &[IncidentRecord]) -> Vec<[f64; 2]> {
    records
        .iter()
        .filter(|r| r.has_coordinates())
        .map(|r| [r.latitude, r.longitude])
        .collect()
}

/// Adds a heat layer statement to `doc`, attached to `parent`.
fn add_heat_layer(
    doc: &mut MapDocument,
    points: &[[f64; 2]],
    heat: &HeatSettings,
    parent: &str,
) -> Result<(), GenerateError> {
    let var = doc.next_var("heat_layer");
    doc.add_statement(format!(
        "var {var} = L.heatLayer({}, {}).addTo({parent});",
        js_value(points)?,
        js_value(heat)?,
    ));
    Ok(())
}

/// Builds a single heatmap over every sampled coordinate.
///
/// # Errors
///
/// Returns [`GenerateError::Json`] if the layer data cannot be serialized.
pub fn render_heatmap(
    records: &[IncidentRecord],
    settings: &MapSettings,
    heat: &HeatSettings,
) -> Result<MapDocument, GenerateError> {
    let points = heat_points(records);

    let mut doc = MapDocument::new("Crime Heatmap", settings);
    doc.require_script(LEAFLET_HEAT_JS);
    add_heat_layer(&mut doc, &points, heat, MAP_VAR)?;

    log::info!("Rendered heatmap with {} points", points.len());
    Ok(doc)
}

/// Builds a heatmap with one feature group per [`ColorBucket`] and a layer
/// control for toggling them. Empty buckets still get a (blank) layer.
///
/// # Errors
///
/// Returns [`GenerateError::Json`] if the layer data cannot be serialized.
pub fn render_layered_heatmap(
    partition: &BucketPartition,
    settings: &MapSettings,
    heat: &HeatSettings,
) -> Result<MapDocument, GenerateError> {
    let mut doc = MapDocument::new("Crime Heatmap by Type", settings);
    doc.require_script(LEAFLET_HEAT_JS);

    let mut overlays = Vec::with_capacity(ColorBucket::all().len());
    for (bucket, points) in partition.iter() {
        let group = doc.next_var("feature_group");
        doc.add_statement(format!("var {group} = L.featureGroup().addTo({MAP_VAR});"));
        add_heat_layer(&mut doc, points, heat, &group)?;
        overlays.push(format!("{}: {group}", js_value(bucket.as_ref())?));
        log::debug!("Layer {bucket}: {} points", points.len());
    }

    doc.add_statement(format!(
        "L.control.layers({{ {}: {TILES_VAR} }}, {{ {} }}, {{ collapsed: true }}).addTo({MAP_VAR});",
        js_value("openstreetmap")?,
        overlays.join(", "),
    ));

    log::info!(
        "Rendered layered heatmap ({})",
        partition
            .iter()
            .map(|(bucket, points)| format!("{bucket}: {}", points.len()))
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(doc)
}
