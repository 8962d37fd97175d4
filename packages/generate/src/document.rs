//! Self-contained Leaflet HTML document builder.

use std::path::Path;

use crate::{GenerateError, MapSettings, escape_html, js_value};

/// Leaflet stylesheet.
const LEAFLET_CSS: &str = "https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.css";

/// Leaflet script.
const LEAFLET_JS: &str = "https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.js";

/// OpenStreetMap raster tile template.
const OSM_TILES: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// OpenStreetMap attribution shown in the map corner.
const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// JavaScript variable holding the `L.Map`.
pub const MAP_VAR: &str = "map";

/// JavaScript variable holding the base tile layer.
pub const TILES_VAR: &str = "base_tiles";

/// Page styling: the map fills the viewport.
const PAGE_CSS: &str = "html, body { width: 100%; height: 100%; margin: 0; padding: 0; }\n\
    #map { position: absolute; top: 0; bottom: 0; right: 0; left: 0; }";

/// An HTML page containing one Leaflet map.
///
/// Renderers register extra assets, overlay markup, and script statements;
/// [`MapDocument::render`] emits them in registration order after the map
/// and base tiles are created.
#[derive(Debug, Clone)]
pub struct MapDocument {
    title: String,
    settings: MapSettings,
    stylesheets: Vec<&'static str>,
    scripts: Vec<&'static str>,
    overlays: Vec<String>,
    statements: Vec<String>,
    next_id: usize,
}

impl MapDocument {
    /// Creates an empty map page.
    #[must_use]
    pub fn new(title: &str, settings: &MapSettings) -> Self {
        Self {
            title: title.to_owned(),
            settings: settings.clone(),
            stylesheets: vec![LEAFLET_CSS],
            scripts: vec![LEAFLET_JS],
            overlays: Vec::new(),
            statements: Vec::new(),
            next_id: 0,
        }
    }

    /// Adds a script URL to the page head. Duplicates are ignored.
    pub fn require_script(&mut self, url: &'static str) {
        if !self.scripts.contains(&url) {
            self.scripts.push(url);
        }
    }

    /// Adds a stylesheet URL to the page head. Duplicates are ignored.
    pub fn require_stylesheet(&mut self, url: &'static str) {
        if !self.stylesheets.contains(&url) {
            self.stylesheets.push(url);
        }
    }

    /// Returns a fresh JavaScript identifier such as `heat_layer_2`.
    pub fn next_var(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}_{}", self.next_id);
        self.next_id += 1;
        id
    }

    /// Adds raw HTML placed in the body after the map container.
    pub fn add_overlay(&mut self, html: String) {
        self.overlays.push(html);
    }

    /// Adds a script statement run after the map is created.
    pub fn add_statement(&mut self, js: String) {
        self.statements.push(js);
    }

    /// Number of script statements registered so far.
    #[must_use]
    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    /// Renders the complete HTML document.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Json`] if map options cannot be serialized.
    pub fn render(&self) -> Result<String, GenerateError> {
        let head: String = self
            .stylesheets
            .iter()
            .map(|href| format!("    <link rel=\"stylesheet\" href=\"{href}\"/>\n"))
            .chain(
                self.scripts
                    .iter()
                    .map(|src| format!("    <script src=\"{src}\"></script>\n")),
            )
            .collect();

        let center = js_value(&[self.settings.center_latitude, self.settings.center_longitude])?;
        let tile_options = js_value(&serde_json::json!({
            "attribution": OSM_ATTRIBUTION,
            "maxZoom": 19,
        }))?;
        let tiles = js_value(OSM_TILES)?;

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
{head}    <style>{css}</style>
</head>
<body>
    <div id="{map}"></div>
{overlays}
    <script>
    var {map} = L.map("{map}", {{ center: {center}, zoom: {zoom} }});
    var {tiles_var} = L.tileLayer({tiles}, {tile_options}).addTo({map});
{statements}
    </script>
</body>
</html>
"#,
            title = escape_html(&self.title),
            css = PAGE_CSS,
            map = MAP_VAR,
            zoom = self.settings.zoom,
            tiles_var = TILES_VAR,
            overlays = self.overlays.join("\n"),
            statements = self
                .statements
                .iter()
                .map(|s| format!("    {s}"))
                .collect::<Vec<_>>()
                .join("\n"),
        ))
    }

    /// Renders and writes the document to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if rendering or the file write fails.
    pub fn save(&self, path: &Path) -> Result<(), GenerateError> {
        let html = self.render()?;
        std::fs::write(path, &html)?;
        log::debug!("Wrote {} ({} bytes)", path.display(), html.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_base_map() {
        let doc = MapDocument::new("Test <Map>", &MapSettings::default());
        let html = doc.render().unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test &lt;Map&gt;</title>"));
        assert!(html.contains(LEAFLET_JS));
        assert!(html.contains("L.map(\"map\", { center: [41.8781,-87.6298], zoom: 11 })"));
        assert!(html.contains("tile.openstreetmap.org/{z}/{x}/{y}.png"));
    }

    #[test]
    fn assets_are_deduplicated() {
        let mut doc = MapDocument::new("t", &MapSettings::default());
        doc.require_script("https://example.com/a.js");
        doc.require_script("https://example.com/a.js");
        doc.require_stylesheet(LEAFLET_CSS);
        let html = doc.render().unwrap();
        assert_eq!(html.matches("https://example.com/a.js").count(), 1);
        assert_eq!(html.matches(LEAFLET_CSS).count(), 1);
    }

    #[test]
    fn head_lists_stylesheets_then_scripts() {
        let mut doc = MapDocument::new("t", &MapSettings::default());
        doc.require_script("https://example.com/b.js");
        doc.require_stylesheet("https://example.com/b.css");
        let html = doc.render().unwrap();

        let css_tag = "    <link rel=\"stylesheet\" href=\"https://example.com/b.css\"/>\n";
        let js_tag = "    <script src=\"https://example.com/b.js\"></script>\n";
        let css_pos = html.find(css_tag).unwrap();
        let js_pos = html.find(js_tag).unwrap();
        assert!(css_pos < js_pos);
        assert!(html.contains(&format!("{js_tag}    <style>")));
    }

    #[test]
    fn vars_are_sequential() {
        let mut doc = MapDocument::new("t", &MapSettings::default());
        assert_eq!(doc.next_var("layer"), "layer_0");
        assert_eq!(doc.next_var("heat"), "heat_1");
    }

    #[test]
    fn statements_follow_map_creation() {
        let mut doc = MapDocument::new("t", &MapSettings::default());
        doc.add_statement("console.log(1);".to_string());
        doc.add_overlay("<div id=\"extra\"></div>".to_string());
        let html = doc.render().unwrap();
        let map_pos = html.find("L.map(").unwrap();
        let stmt_pos = html.find("console.log(1);").unwrap();
        assert!(stmt_pos > map_pos);
        assert!(html.contains("<div id=\"extra\"></div>"));
        assert_eq!(doc.statement_count(), 1);
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut doc = MapDocument::new("t", &MapSettings::default());
        doc.add_statement("x();".to_string());
        assert_eq!(doc.render().unwrap(), doc.render().unwrap());
    }
}
