//! Color-bucket classification.
//!
//! Maps a free-text crime category onto one of four display buckets by
//! case-insensitive keyword match. Rules are evaluated in the order of
//! [`CLASSIFICATION_RULES`] and the first hit wins, so a category naming
//! both a homicide and a theft lands in [`ColorBucket::Homicide`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::IncidentRecord;

/// Display bucket used for marker colors and heat-layer partitioning.
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
pub enum ColorBucket {
    /// Any category mentioning "homicide".
    Homicide,
    /// Any category mentioning "theft".
    Theft,
    /// Any category mentioning "battery".
    Battery,
    /// Everything else.
    Other,
}

/// A single keyword rule: categories containing `keyword` (lowercase)
/// belong to `bucket`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    /// Lowercase substring to look for.
    pub keyword: &'static str,
    /// Bucket assigned on a match.
    pub bucket: ColorBucket,
}

/// Ordered classification rules. Earlier rules take precedence.
pub const CLASSIFICATION_RULES: &[KeywordRule] = &[
    KeywordRule {
        keyword: "homicide",
        bucket: ColorBucket::Homicide,
    },
    KeywordRule {
        keyword: "theft",
        bucket: ColorBucket::Theft,
    },
    KeywordRule {
        keyword: "battery",
        bucket: ColorBucket::Battery,
    },
];

impl ColorBucket {
    /// Classifies a free-text category. Total over all inputs: anything no
    /// rule matches is [`ColorBucket::Other`].
    #[must_use]
    pub fn classify(category: &str) -> Self {
        let lower = category.to_lowercase();
        CLASSIFICATION_RULES
            .iter()
            .find(|rule| lower.contains(rule.keyword))
            .map_or(Self::Other, |rule| rule.bucket)
    }

    /// CSS color name used for markers, legend swatches, and animated
    /// point icons.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Homicide => "red",
            Self::Theft => "blue",
            Self::Battery => "orange",
            Self::Other => "gray",
        }
    }

    /// Returns all variants in legend order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Homicide, Self::Theft, Self::Battery, Self::Other]
    }
}

/// Coordinates of a set of records split by [`ColorBucket`].
///
/// Every bucket is always present, possibly with zero points, so
/// renderers can emit one layer per bucket unconditionally.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketPartition {
    buckets: BTreeMap<ColorBucket, Vec<[f64; 2]>>,
}

impl BucketPartition {
    /// Partitions `records` by bucket, keeping `[latitude, longitude]`
    /// pairs in input order. Records without finite coordinates are
    /// skipped.
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a IncidentRecord>) -> Self {
        let mut buckets: BTreeMap<ColorBucket, Vec<[f64; 2]>> = ColorBucket::all()
            .iter()
            .map(|&bucket| (bucket, Vec::new()))
            .collect();

        for record in records {
            if !record.has_coordinates() {
                continue;
            }
            buckets
                .entry(record.bucket())
                .or_default()
                .push([record.latitude, record.longitude]);
        }

        Self { buckets }
    }

    /// Returns the coordinates assigned to `bucket`.
    #[must_use]
    pub fn points(&self, bucket: ColorBucket) -> &[[f64; 2]] {
        self.buckets.get(&bucket).map_or(&[][..], Vec::as_slice)
    }

    /// Returns the number of points in `bucket`.
    #[must_use]
    pub fn count(&self, bucket: ColorBucket) -> usize {
        self.points(bucket).len()
    }

    /// Total number of partitioned points.
    #[must_use]
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Iterates buckets in legend order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorBucket, &[[f64; 2]])> {
        self.buckets
            .iter()
            .map(|(bucket, points)| (*bucket, points.as_slice()))
    }
}
