//! Static color legend overlay for the marker map.

use crime_viz_crime_models::ColorBucket;

use crate::escape_html;

/// Legend heading.
pub const LEGEND_TITLE: &str = "Crime Type Legend";

const BOX_STYLE: &str = "position: fixed; bottom: 50px; left: 50px; z-index: 9999; \
    background-color: white; padding: 10px; border: 2px solid grey; border-radius: 5px; \
    box-shadow: 2px 2px 6px rgba(0,0,0,0.3); font-size: 14px;";

const SWATCH_STYLE: &str = "width: 10px; height: 10px; display: inline-block; border-radius: 50%;";

/// Builds the fixed-position legend block listing every [`ColorBucket`]
/// with its swatch color.
#[must_use]
pub fn legend_html() -> String {
    let entries: Vec<String> = ColorBucket::all()
        .iter()
        .map(|bucket| {
            format!(
                "        <i style=\"background: {color}; {SWATCH_STYLE}\"></i> {label}",
                color = bucket.color(),
                label = escape_html(bucket.as_ref()),
            )
        })
        .collect();

    format!(
        "    <div class=\"crime-legend\" style=\"{BOX_STYLE}\">\n        <b>{LEGEND_TITLE}</b><br>\n{}\n    </div>",
        entries.join("<br>\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_bucket_in_order() {
        let html = legend_html();
        let positions: Vec<usize> = ["Homicide", "Theft", "Battery", "Other"]
            .iter()
            .map(|label| html.find(label).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn swatches_use_bucket_colors() {
        let html = legend_html();
        for color in ["red", "blue", "orange", "gray"] {
            assert!(html.contains(&format!("background: {color};")), "{color}");
        }
        assert!(html.contains("<b>Crime Type Legend</b>"));
    }
}
