#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident record and classification types shared across the crime-viz
//! pipeline.
//!
//! The loader produces [`IncidentRecord`]s, the sampler draws from them,
//! and every renderer colors and partitions them through [`ColorBucket`].

pub mod bucket;

use chrono::{Datelike as _, NaiveDateTime, Timelike as _, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use bucket::{BucketPartition, CLASSIFICATION_RULES, ColorBucket, KeywordRule};

/// Day of the week with locale-independent English names.
///
/// Ordering and [`DayOfWeek::all`] are Monday-first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Returns all variants in Monday-first order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
            Self::Sunday,
        ]
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

/// One cleaned row of the incident dataset.
///
/// Every record that exists has a parsed timestamp and both coordinates;
/// rows lacking either never make it past the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IncidentRecord {
    /// Free-text crime category (e.g. `"THEFT"`, `"HOMICIDE FIRST DEGREE"`).
    pub primary_description: String,
    /// When the incident occurred. Source timestamps carry no timezone.
    pub date: NaiveDateTime,
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Day of the week.
    pub weekday: DayOfWeek,
    /// Month, 1-12.
    pub month: u32,
    /// Four-digit year.
    pub year: i32,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Whether an arrest was made. `None` when the source cell is blank or
    /// unrecognized.
    pub arrest: Option<bool>,
}

impl IncidentRecord {
    /// Builds a record, deriving the calendar fields from `date`.
    #[must_use]
    pub fn new(
        primary_description: String,
        date: NaiveDateTime,
        latitude: f64,
        longitude: f64,
        arrest: Option<bool>,
    ) -> Self {
        Self {
            primary_description,
            hour: date.hour(),
            weekday: date.weekday().into(),
            month: date.month(),
            year: date.year(),
            date,
            latitude,
            longitude,
            arrest,
        }
    }

    /// Returns the color bucket for this record's category.
    #[must_use]
    pub fn bucket(&self) -> ColorBucket {
        ColorBucket::classify(&self.primary_description)
    }

    /// Returns `true` when both coordinates are finite numbers.
    #[must_use]
    pub const fn has_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}
