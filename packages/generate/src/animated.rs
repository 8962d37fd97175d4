//! Animated time-slider map.
//!
//! Each record becomes a timestamped `GeoJSON` point rendered through
//! `Leaflet.TimeDimension`, which replays the points in time order under a
//! playback control.

use crime_viz_crime_models::{ColorBucket, IncidentRecord};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;
use serde_json::json;

use crate::document::MAP_VAR;
use crate::{GenerateError, MapDocument, MapSettings, js_value};

const JQUERY_JS: &str = "https://cdnjs.cloudflare.com/ajax/libs/jquery/3.7.1/jquery.min.js";
const JQUERY_UI_JS: &str = "https://cdnjs.cloudflare.com/ajax/libs/jqueryui/1.10.2/jquery-ui.min.js";
const ISO8601_JS: &str = "https://cdn.jsdelivr.net/npm/iso8601-js-period@0.2.1/iso8601.min.js";
const TIME_DIMENSION_JS: &str =
    "https://cdn.jsdelivr.net/npm/leaflet-timedimension@1.1.1/dist/leaflet.timedimension.min.js";
const TIME_DIMENSION_CSS: &str =
    "https://cdn.jsdelivr.net/npm/leaflet-timedimension@1.1.1/dist/leaflet.timedimension.control.css";
const MOMENT_JS: &str = "https://cdnjs.cloudflare.com/ajax/libs/moment.js/2.18.1/moment.min.js";

/// `chrono` format for feature timestamps: ISO 8601 without a timezone.
pub const FEATURE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Animated point radius in pixels.
pub const POINT_RADIUS: u32 = 5;

/// Animated point fill opacity.
pub const POINT_FILL_OPACITY: f64 = 0.6;

/// Playback configuration for the time slider.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSettings {
    /// ISO 8601 step between slider positions.
    pub period: String,
    /// Keep the last point of each feature visible.
    pub add_last_point: bool,
    /// Start playing on load.
    pub auto_play: bool,
    /// Restart playback when the end is reached.
    pub loop_playback: bool,
    /// Slowest speed offered by the speed slider, in steps per second.
    pub min_speed: f64,
    /// Fastest speed offered by the speed slider, in steps per second.
    pub max_speed: u32,
    /// Milliseconds spent moving between two slider positions.
    pub transition_time_ms: u32,
    /// Show the loop toggle button.
    pub loop_button: bool,
    /// `moment.js` format for the displayed date.
    pub date_format: String,
    /// Update the map while the slider is dragged.
    pub time_slider_drag_update: bool,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            period: "PT1H".to_string(),
            add_last_point: true,
            auto_play: true,
            loop_playback: false,
            min_speed: 0.1,
            max_speed: 1,
            transition_time_ms: 200,
            loop_button: true,
            date_format: "YYYY-MM-DD HH:mm".to_string(),
            time_slider_drag_update: true,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerOptions {
    transition_time: u32,
    #[serde(rename = "loop")]
    loop_playback: bool,
    start_over: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ControlOptions<'a> {
    position: &'a str,
    auto_play: bool,
    loop_button: bool,
    time_slider_drag_update: bool,
    speed_slider: bool,
    min_speed: f64,
    max_speed: u32,
    player_options: PlayerOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayerOptions {
    update_time_dimension: bool,
    #[serde(rename = "addlastPoint")]
    add_last_point: bool,
    duration: Option<String>,
}

/// Builds one timestamped point feature per record, skipping records
/// without finite coordinates.
#[must_use]
pub fn timeline_features(records: &[IncidentRecord]) -> FeatureCollection {
    let features = records
        .iter()
        .filter(|r| r.has_coordinates())
        .map(|record| {
            let mut properties = JsonObject::new();
            properties.insert(
                "time".to_string(),
                json!(record.date.format(FEATURE_TIME_FORMAT).to_string()),
            );
            properties.insert("popup".to_string(), json!(record.primary_description));
            properties.insert("icon".to_string(), json!("circle"));
            properties.insert(
                "iconstyle".to_string(),
                json!({
                    "fillColor": ColorBucket::classify(&record.primary_description).color(),
                    "fillOpacity": POINT_FILL_OPACITY,
                    "stroke": false,
                    "radius": POINT_RADIUS,
                }),
            );

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![
                    record.longitude,
                    record.latitude,
                ]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Builds the animated map document.
///
/// # Errors
///
/// Returns [`GenerateError::Json`] if the feature data or options cannot be
/// serialized.
pub fn render_animated_map(
    records: &[IncidentRecord],
    settings: &MapSettings,
    timeline: &TimelineSettings,
) -> Result<MapDocument, GenerateError> {
    let collection = timeline_features(records);
    let feature_count = collection.features.len();

    let mut doc = MapDocument::new("Animated Crime Map", settings);
    for script in [JQUERY_JS, JQUERY_UI_JS, ISO8601_JS, TIME_DIMENSION_JS, MOMENT_JS] {
        doc.require_script(script);
    }
    doc.require_stylesheet(TIME_DIMENSION_CSS);

    let control_options = ControlOptions {
        position: "bottomleft",
        auto_play: timeline.auto_play,
        loop_button: timeline.loop_button,
        time_slider_drag_update: timeline.time_slider_drag_update,
        speed_slider: true,
        min_speed: timeline.min_speed,
        max_speed: timeline.max_speed,
        player_options: PlayerOptions {
            transition_time: timeline.transition_time_ms,
            loop_playback: timeline.loop_playback,
            start_over: true,
        },
    };
    let layer_options = LayerOptions {
        update_time_dimension: true,
        add_last_point: timeline.add_last_point,
        duration: None,
    };

    doc.add_statement(format!(
        "L.Control.TimeDimensionCustom = L.Control.TimeDimension.extend({{ \
         _getDisplayDateFormat: function (date) {{ return moment(date).format({}); }} }});",
        js_value(&timeline.date_format)?,
    ));
    doc.add_statement(format!(
        "{MAP_VAR}.timeDimension = L.timeDimension({});",
        js_value(&json!({ "period": timeline.period }))?,
    ));

    let control = doc.next_var("time_control");
    doc.add_statement(format!(
        "var {control} = new L.Control.TimeDimensionCustom({});",
        js_value(&control_options)?,
    ));
    doc.add_statement(format!("{MAP_VAR}.addControl({control});"));

    let geojson_var = doc.next_var("geojson");
    doc.add_statement(format!(
        "var {geojson_var} = L.geoJson({}, {{ \
         pointToLayer: function (feature, latLng) {{ \
         if (feature.properties.icon === \"circle\") {{ return L.circleMarker(latLng, feature.properties.iconstyle || {{}}); }} \
         return L.marker(latLng); }}, \
         onEachFeature: function (feature, layer) {{ \
         if (feature.properties.popup) {{ layer.bindPopup(feature.properties.popup); }} }} }});",
        js_value(&collection)?,
    ));

    let timed = doc.next_var("timed_layer");
    doc.add_statement(format!(
        "var {timed} = L.timeDimension.layer.geoJson({geojson_var}, {}).addTo({MAP_VAR});",
        js_value(&layer_options)?,
    ));

    log::info!("Rendered animated map with {feature_count} timed points");
    Ok(doc)
}
