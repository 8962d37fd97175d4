#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Seeded sampling of cleaned incidents for the map renderers.
//!
//! Homicides are rare, so a uniform draw would show almost none of them.
//! The incident sample instead draws a fixed number from the homicide pool
//! and a fixed number from everything else, minority first. All draws use
//! a seeded [`StdRng`], so the same input order and seeds always produce
//! the same sample.

use crime_viz_crime_models::IncidentRecord;
use rand::SeedableRng as _;
use rand::rngs::StdRng;
use rand::seq::index;

/// Lowercase keyword that puts a record in the minority pool.
pub const MINORITY_KEYWORD: &str = "homicide";

/// Records drawn from the minority pool.
pub const MINORITY_SAMPLE_SIZE: usize = 50;

/// Seed for the minority draw.
pub const MINORITY_SEED: u64 = 1;

/// Records drawn from the majority pool.
pub const MAJORITY_SAMPLE_SIZE: usize = 950;

/// Seed for the majority draw.
pub const MAJORITY_SEED: u64 = 2;

/// Records drawn from the combined sample for the animated map.
pub const ANIMATION_SAMPLE_SIZE: usize = 200;

/// Seed for the animation draw.
pub const ANIMATION_SEED: u64 = 3;

/// Sizes and seeds for every draw in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSettings {
    /// Minority (homicide) draw size.
    pub minority_size: usize,
    /// Minority draw seed.
    pub minority_seed: u64,
    /// Majority draw size.
    pub majority_size: usize,
    /// Majority draw seed.
    pub majority_seed: u64,
    /// Animation sub-sample size.
    pub animation_size: usize,
    /// Animation sub-sample seed.
    pub animation_seed: u64,
}

impl Default for SampleSettings {
    fn default() -> Self {
        Self {
            minority_size: MINORITY_SAMPLE_SIZE,
            minority_seed: MINORITY_SEED,
            majority_size: MAJORITY_SAMPLE_SIZE,
            majority_seed: MAJORITY_SEED,
            animation_size: ANIMATION_SAMPLE_SIZE,
            animation_seed: ANIMATION_SEED,
        }
    }
}

/// The stratified sample consumed by the map renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentSample {
    /// Minority records followed by majority records.
    pub records: Vec<IncidentRecord>,
    /// How many leading entries of `records` came from the minority pool.
    pub minority_count: usize,
}

impl IncidentSample {
    /// Records drawn from the minority pool.
    #[must_use]
    pub fn minority(&self) -> &[IncidentRecord] {
        &self.records[..self.minority_count]
    }

    /// Records drawn from the majority pool.
    #[must_use]
    pub fn majority(&self) -> &[IncidentRecord] {
        &self.records[self.minority_count..]
    }
}

/// Returns `true` if the category belongs to the minority pool.
#[must_use]
pub fn is_minority(category: &str) -> bool {
    category.to_lowercase().contains(MINORITY_KEYWORD)
}

/// Draws up to `n` items from `pool` without replacement using a generator
/// seeded with `seed`. Returns the whole pool (in draw order) when it holds
/// fewer than `n` items.
#[must_use]
pub fn draw_without_replacement<T: Clone>(pool: &[T], n: usize, seed: u64) -> Vec<T> {
    let amount = n.min(pool.len());
    if amount < n {
        log::warn!(
            "Requested {n} records but only {} available; taking all",
            pool.len()
        );
    }

    let mut rng = StdRng::seed_from_u64(seed);
    index::sample(&mut rng, pool.len(), amount)
        .into_iter()
        .map(|i| pool[i].clone())
        .collect()
}

/// Splits `records` into minority and majority pools and draws the
/// stratified incident sample.
#[must_use]
pub fn draw_incident_sample(
    records: &[IncidentRecord],
    settings: &SampleSettings,
) -> IncidentSample {
    let (minority_pool, majority_pool): (Vec<&IncidentRecord>, Vec<&IncidentRecord>) = records
        .iter()
        .partition(|r| is_minority(&r.primary_description));

    log::info!(
        "Sampling {} of {} minority and {} of {} majority records",
        settings.minority_size.min(minority_pool.len()),
        minority_pool.len(),
        settings.majority_size.min(majority_pool.len()),
        majority_pool.len(),
    );

    let mut sample: Vec<IncidentRecord> = draw_without_replacement(
        &minority_pool,
        settings.minority_size,
        settings.minority_seed,
    )
    .into_iter()
    .cloned()
    .collect();
    let minority_count = sample.len();
    sample.extend(
        draw_without_replacement(
            &majority_pool,
            settings.majority_size,
            settings.majority_seed,
        )
        .into_iter()
        .cloned(),
    );

    IncidentSample {
        records: sample,
        minority_count,
    }
}

/// Draws the animation sub-sample from an already drawn incident sample.
#[must_use]
pub fn draw_animation_sample(
    sample: &IncidentSample,
    settings: &SampleSettings,
) -> Vec<IncidentRecord> {
    draw_without_replacement(
        &sample.records,
        settings.animation_size,
        settings.animation_seed,
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;

    use super::*;

    fn records(homicides: usize, others: usize) -> Vec<IncidentRecord> {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(3, 0, 0)
            .unwrap();
        (0..homicides + others)
            .map(|i| {
                let category = if i < homicides {
                    format!("HOMICIDE #{i}")
                } else {
                    format!("THEFT #{i}")
                };
                #[allow(clippy::cast_precision_loss)]
                let lat = 41.0 + i as f64 * 0.0001;
                IncidentRecord::new(category, date, lat, -87.6, None)
            })
            .collect()
    }

    #[test]
    fn minority_match_is_case_insensitive_substring() {
        assert!(is_minority("HOMICIDE"));
        assert!(is_minority("reckless homicide"));
        assert!(!is_minority("THEFT"));
    }

    #[test]
    fn draws_fixed_sizes_minority_first() {
        let data = records(80, 2000);
        let sample = draw_incident_sample(&data, &SampleSettings::default());

        assert_eq!(sample.records.len(), 1000);
        assert_eq!(sample.minority_count, 50);
        assert!(sample
            .minority()
            .iter()
            .all(|r| is_minority(&r.primary_description)));
        assert!(sample
            .majority()
            .iter()
            .all(|r| !is_minority(&r.primary_description)));
    }

    #[test]
    fn draws_without_replacement() {
        let data = records(80, 2000);
        let sample = draw_incident_sample(&data, &SampleSettings::default());
        let unique: BTreeSet<&str> = sample
            .records
            .iter()
            .map(|r| r.primary_description.as_str())
            .collect();
        assert_eq!(unique.len(), sample.records.len());
    }

    #[test]
    fn same_seed_same_sample() {
        let data = records(80, 2000);
        let settings = SampleSettings::default();
        let a = draw_incident_sample(&data, &settings);
        let b = draw_incident_sample(&data, &settings);
        assert_eq!(a, b);
        assert_eq!(
            draw_animation_sample(&a, &settings),
            draw_animation_sample(&b, &settings)
        );
    }

    #[test]
    fn draws_are_pinned_per_seed() {
        // Changes here mean every generated map changes too.
        let pool: Vec<usize> = (0..100).collect();
        assert_eq!(draw_without_replacement(&pool, 5, MINORITY_SEED), [79, 94, 78, 68, 19]);
        assert_eq!(draw_without_replacement(&pool, 5, MAJORITY_SEED), [28, 89, 1, 45, 53]);
        assert_eq!(draw_without_replacement(&pool, 5, ANIMATION_SEED), [62, 9, 96, 14, 18]);

        let small: Vec<usize> = (0..30).collect();
        assert_eq!(
            draw_without_replacement(&small, 20, MINORITY_SEED),
            [24, 29, 0, 21, 9, 15, 11, 6, 13, 1, 2, 8, 3, 22, 17, 12, 16, 27, 4, 20]
        );
    }

    #[test]
    fn different_seed_changes_draw() {
        let pool: Vec<u32> = (0..1000).collect();
        assert_ne!(
            draw_without_replacement(&pool, 20, 1),
            draw_without_replacement(&pool, 20, 2)
        );
    }

    #[test]
    fn small_pools_are_taken_whole() {
        let data = records(1, 1);
        let sample = draw_incident_sample(&data, &SampleSettings::default());
        assert_eq!(sample.minority_count, 1);
        assert_eq!(sample.records.len(), 2);
        assert_eq!(draw_animation_sample(&sample, &SampleSettings::default()).len(), 2);
    }

    #[test]
    fn animation_sample_is_subset_of_incident_sample() {
        let data = records(80, 2000);
        let settings = SampleSettings::default();
        let sample = draw_incident_sample(&data, &settings);
        let animated = draw_animation_sample(&sample, &settings);
        assert_eq!(animated.len(), ANIMATION_SAMPLE_SIZE);
        for r in &animated {
            assert!(sample.records.contains(r));
        }
    }

    #[test]
    fn empty_input_yields_empty_sample() {
        let sample = draw_incident_sample(&[], &SampleSettings::default());
        assert!(sample.records.is_empty());
        assert_eq!(sample.minority_count, 0);
    }
}
