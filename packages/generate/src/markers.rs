//! Color-coded circle marker map.
//!
//! One marker per sampled record, colored by [`ColorBucket`], with the
//! category and formatted timestamp as tooltip and the category as popup.
//! Markers are added in sample order, so later records draw on top.

use crime_viz_crime_models::{ColorBucket, IncidentRecord};
use serde::Serialize;

use crate::document::MAP_VAR;
use crate::legend::legend_html;
use crate::{GenerateError, MapDocument, MapSettings, js_value};

/// Marker radius in pixels.
pub const MARKER_RADIUS: u32 = 3;

/// Marker fill opacity.
pub const MARKER_FILL_OPACITY: f64 = 0.6;

/// `chrono` format for tooltip timestamps, e.g. `Jan 02, 2023 10:15 PM`.
pub const TOOLTIP_TIME_FORMAT: &str = "%b %d, %Y %I:%M %p";

/// Inlined data for one marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerPoint {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Stroke and fill color.
    pub color: &'static str,
    /// Hover text.
    pub tooltip: String,
    /// Click text.
    pub popup: String,
}

impl MarkerPoint {
    /// Builds the marker for one record.
    #[must_use]
    pub fn from_record(record: &IncidentRecord) -> Self {
        Self {
            lat: record.latitude,
            lng: record.longitude,
            color: ColorBucket::classify(&record.primary_description).color(),
            tooltip: format!(
                "{} - {}",
                record.primary_description,
                record.date.format(TOOLTIP_TIME_FORMAT)
            ),
            popup: record.primary_description.clone(),
        }
    }
}

/// Builds the marker map document with the static legend attached.
///
/// # Errors
///
/// Returns [`GenerateError::Json`] if the marker data cannot be serialized.
pub fn render_marker_map(
    records: &[IncidentRecord],
    settings: &MapSettings,
) -> Result<MapDocument, GenerateError> {
    let points: Vec<MarkerPoint> = records.iter().map(MarkerPoint::from_record).collect();

    let mut doc = MapDocument::new("Color-Coded Crime Map", settings);
    let data_var = doc.next_var("markers");
    let style = js_value(&serde_json::json!({
        "radius": MARKER_RADIUS,
        "fill": true,
        "fillOpacity": MARKER_FILL_OPACITY,
    }))?;

    doc.add_statement(format!("var {data_var} = {};", js_value(&points)?));
    doc.add_statement(format!(
        "{data_var}.forEach(function (p) {{ \
         L.circleMarker([p.lat, p.lng], Object.assign({{ color: p.color, fillColor: p.color }}, {style})) \
         .bindTooltip(p.tooltip).bindPopup(p.popup).addTo({MAP_VAR}); }});"
    ));
    doc.add_overlay(legend_html());

    log::info!("Rendered {} markers", points.len());
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(category: &str) -> IncidentRecord {
        let date = NaiveDate::from_ymd_opt(2023, 1, 2)
            .unwrap()
            .and_hms_opt(22, 15, 0)
            .unwrap();
        IncidentRecord::new(category.to_string(), date, 41.88, -87.63, Some(false))
    }

    #[test]
    fn tooltip_uses_twelve_hour_clock() {
        let point = MarkerPoint::from_record(&record("THEFT"));
        assert_eq!(point.tooltip, "THEFT - Jan 02, 2023 10:15 PM");
        assert_eq!(point.popup, "THEFT");
        assert_eq!(point.color, "blue");
    }

    #[test]
    fn marker_colors_follow_buckets() {
        let colors: Vec<&str> = ["HOMICIDE", "THEFT", "AGG BATTERY", "ARSON"]
            .iter()
            .map(|c| MarkerPoint::from_record(&record(c)).color)
            .collect();
        assert_eq!(colors, ["red", "blue", "orange", "gray"]);
    }

    #[test]
    fn document_inlines_markers_and_legend() {
        let records = vec![record("HOMICIDE"), record("THEFT")];
        let html = render_marker_map(&records, &MapSettings::default())
            .unwrap()
            .render()
            .unwrap();

        let start = html.find("var markers_0 = ").unwrap() + "var markers_0 = ".len();
        let end = start + html[start..].find(";\n").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&html[start..end]).unwrap();
        let parsed = parsed.as_array().unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["popup"], "HOMICIDE");
        assert_eq!(parsed[1]["color"], "blue");

        assert!(html.contains("Crime Type Legend"));
        assert!(html.contains("\"radius\":3"));
    }

    #[test]
    fn empty_sample_renders_empty_marker_list() {
        let html = render_marker_map(&[], &MapSettings::default())
            .unwrap()
            .render()
            .unwrap();
        assert!(html.contains("var markers_0 = [];"));
    }
}
