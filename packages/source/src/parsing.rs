//! Cell-level parsing helpers shared by the loader.

use chrono::NaiveDateTime;

/// Normalizes a header name: trims, lowercases, and replaces every space
/// with an underscore. Runs of spaces are not collapsed, so
/// `"Date  Of Occurrence"` becomes `"date__of_occurrence"`.
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// Parses a timestamp that must match `format` exactly. Returns `None` for
/// blank or non-matching input.
#[must_use]
pub fn parse_timestamp(s: &str, format: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(s, format).ok()
}

/// Parses a coordinate cell. Returns `None` if blank, non-numeric, or not
/// finite.
#[must_use]
pub fn parse_coordinate(s: &str) -> Option<f64> {
    let value = s.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Parses lat/lng cells together. Returns `None` if either is missing.
#[must_use]
pub fn parse_lat_lng(lat: &str, lng: &str) -> Option<(f64, f64)> {
    Some((parse_coordinate(lat)?, parse_coordinate(lng)?))
}

/// Parses an arrest indicator. Accepts the common boolean spellings found
/// in city exports (`Y`/`N`, `true`/`false`, `1`/`0`) case-insensitively.
#[must_use]
pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "t" | "1" => Some(true),
        "n" | "no" | "false" | "f" | "0" => Some(false),
        _ => None,
    }
}
