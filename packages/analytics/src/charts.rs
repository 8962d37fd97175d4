//! Terminal rendering for [`CountChart`]s.
//!
//! Bars are scaled against the chart's largest count. Line charts draw a
//! dotted leader up to a point marker so the trend reads top to bottom.

use console::{Term, style};

use crate::{AnalyticsError, ChartKind, CountChart};

/// Width in columns of the longest bar.
pub const DEFAULT_WIDTH: usize = 50;

const BAR: char = '\u{2588}';
const LEADER: char = '\u{00b7}';
const POINT: char = '\u{25cf}';

/// Scales `count` to `width` columns relative to `max`.
fn scaled(count: u64, max: u64, width: usize) -> usize {
    if max == 0 {
        return 0;
    }
    let width = width as u64;
    usize::try_from(count.saturating_mul(width) / max).unwrap_or(0)
}

/// Renders a chart as plain text, one row per point.
#[must_use]
pub fn render_text(chart: &CountChart, width: usize) -> String {
    let max = chart.max();
    let label_width = chart
        .points
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = format!("{}\n{} by {}\n", chart.title, chart.y_label, chart.x_label);

    if chart.points.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    for point in &chart.points {
        let len = scaled(point.count, max, width);
        let drawn: String = match chart.kind {
            ChartKind::Bar => std::iter::repeat_n(BAR, len).collect(),
            ChartKind::Line => std::iter::repeat_n(LEADER, len)
                .chain(std::iter::once(POINT))
                .collect(),
        };
        out.push_str(&format!(
            "{:>label_width$} | {drawn} {}\n",
            point.label, point.count
        ));
    }

    out
}

/// Writes a chart to the terminal's stdout with a highlighted title.
///
/// # Errors
///
/// Returns [`AnalyticsError::Io`] if writing to the terminal fails.
pub fn show(chart: &CountChart) -> Result<(), AnalyticsError> {
    let term = Term::stdout();
    let text = render_text(chart, DEFAULT_WIDTH);
    let mut lines = text.lines();

    if let Some(title) = lines.next() {
        term.write_line(&style(title).bold().cyan().to_string())?;
    }
    for line in lines {
        term.write_line(line)?;
    }
    term.write_line("")?;

    log::debug!("Displayed chart '{}' ({} records)", chart.title, chart.total());
    Ok(())
}
