#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Descriptive count charts over the cleaned incident dataset.
//!
//! Each aggregation groups records by one derived calendar field and
//! returns a [`CountChart`] ready for display. Charts are shown in the
//! terminal session and never written to disk.

pub mod charts;

use std::collections::BTreeMap;

use crime_viz_crime_models::{DayOfWeek, IncidentRecord};
use thiserror::Error;

/// Y-axis label shared by every chart.
const COUNT_LABEL: &str = "Number of Crimes";

/// Errors that can occur while displaying charts.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Writing to the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a chart's points are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// One bar per category.
    Bar,
    /// Points along an ordered axis.
    Line,
}

/// A labeled count on a chart's x-axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountPoint {
    /// X-axis label (e.g. `"13"`, `"Monday"`, `"2024"`).
    pub label: String,
    /// Number of records in this slot.
    pub count: u64,
}

/// A single count chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountChart {
    /// Chart title.
    pub title: &'static str,
    /// X-axis label.
    pub x_label: &'static str,
    /// Y-axis label.
    pub y_label: &'static str,
    /// Bar or line.
    pub kind: ChartKind,
    /// Points in axis order.
    pub points: Vec<CountPoint>,
}

impl CountChart {
    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.points.iter().map(|p| p.count).sum()
    }

    /// Largest single count, or zero for an empty chart.
    #[must_use]
    pub fn max(&self) -> u64 {
        self.points.iter().map(|p| p.count).max().unwrap_or(0)
    }
}

/// Counts records falling on each key, emitting every key in `domain` in
/// order (including zeros).
fn count_over<K: Ord + Copy + ToString>(
    records: &[IncidentRecord],
    domain: impl IntoIterator<Item = K>,
    key: impl Fn(&IncidentRecord) -> K,
) -> Vec<CountPoint> {
    let mut counts: BTreeMap<K, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(key(record)).or_insert(0) += 1;
    }
    domain
        .into_iter()
        .map(|k| CountPoint {
            label: k.to_string(),
            count: counts.get(&k).copied().unwrap_or(0),
        })
        .collect()
}

/// Bar chart of incidents per hour of day, 0 through 23.
#[must_use]
pub fn count_by_hour(records: &[IncidentRecord]) -> CountChart {
    CountChart {
        title: "Crime Count by Hour of Day",
        x_label: "Hour of Day (0\u{2013}23)",
        y_label: COUNT_LABEL,
        kind: ChartKind::Bar,
        points: count_over(records, 0..24_u32, |r| r.hour),
    }
}

/// Bar chart of incidents per weekday, Monday first.
#[must_use]
pub fn count_by_weekday(records: &[IncidentRecord]) -> CountChart {
    CountChart {
        title: "Crime Count by Day of the Week",
        x_label: "Day of the Week",
        y_label: COUNT_LABEL,
        kind: ChartKind::Bar,
        points: count_over(records, DayOfWeek::all().iter().copied(), |r| r.weekday),
    }
}

/// Line chart of incidents per calendar month, pooled across all years.
#[must_use]
pub fn count_by_month(records: &[IncidentRecord]) -> CountChart {
    CountChart {
        title: "Crime Trends by Month",
        x_label: "Month (1 = Jan, 12 = Dec)",
        y_label: COUNT_LABEL,
        kind: ChartKind::Line,
        points: count_over(records, 1..=12_u32, |r| r.month),
    }
}

/// Line chart of incidents per year, over the years present in the data.
#[must_use]
pub fn count_by_year(records: &[IncidentRecord]) -> CountChart {
    let mut years: Vec<i32> = records.iter().map(|r| r.year).collect();
    years.sort_unstable();
    years.dedup();

    CountChart {
        title: "Crime Trends by Year",
        x_label: "Year",
        y_label: COUNT_LABEL,
        kind: ChartKind::Line,
        points: count_over(records, years, |r| r.year),
    }
}

/// Builds all four exploratory charts in display order.
#[must_use]
pub fn exploratory_charts(records: &[IncidentRecord]) -> Vec<CountChart> {
    vec![
        count_by_hour(records),
        count_by_weekday(records),
        count_by_month(records),
        count_by_year(records),
    ]
}
