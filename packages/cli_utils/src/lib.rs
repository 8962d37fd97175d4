#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing for the `crime_viz` binary: an `indicatif` renderer
//! for load progress, a bar for pipeline stages, and logger setup that
//! keeps log lines from tearing either of them.

use std::sync::Arc;
use std::time::Duration;

use crime_viz_source::progress::ProgressCallback;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

const LOAD_SPINNER_TEMPLATE: &str =
    "{spinner:.cyan} {msg} {bytes} read, {prefix} rows [{elapsed}]";
const LOAD_BAR_TEMPLATE: &str =
    "{msg} {wide_bar:.cyan/dim} {bytes}/{total_bytes}, {prefix} rows [{eta}]";
const STAGE_TEMPLATE: &str = "{msg:<24} {wide_bar:.green/dim} {pos}/{len} [{elapsed_precise}]";

/// Draws CSV load progress: a byte bar when the input size is known, a
/// spinner otherwise.
pub struct LoadProgressBar {
    bar: ProgressBar,
}

impl LoadProgressBar {
    /// Adds a load bar to `multi`. Its shape is chosen on
    /// [`ProgressCallback::start`].
    #[must_use]
    pub fn attach(multi: &MultiProgress) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::no_length());
        Arc::new(Self { bar })
    }
}

fn style(template: &str, fallback: fn() -> ProgressStyle) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| fallback())
}

impl ProgressCallback for LoadProgressBar {
    fn start(&self, label: &str, total_bytes: Option<u64>) {
        match total_bytes {
            Some(total) => {
                self.bar.set_length(total);
                self.bar.set_style(
                    style(LOAD_BAR_TEMPLATE, ProgressStyle::default_bar).progress_chars("##-"),
                );
            }
            None => {
                self.bar
                    .set_style(style(LOAD_SPINNER_TEMPLATE, ProgressStyle::default_spinner));
                self.bar.enable_steady_tick(Duration::from_millis(100));
            }
        }
        self.bar.set_prefix("0");
        self.bar.set_message(label.to_owned());
    }

    fn advance(&self, bytes_read: u64, rows_read: u64) {
        self.bar.set_position(bytes_read);
        self.bar.set_prefix(rows_read.to_string());
    }

    fn finish(&self, summary: String) {
        self.bar.finish_with_message(summary);
    }
}

/// Bar counting finished pipeline stages out of `stages`.
#[must_use]
pub fn stage_bar(multi: &MultiProgress, stages: u64) -> ProgressBar {
    let bar = multi.add(ProgressBar::new(stages));
    bar.set_style(style(STAGE_TEMPLATE, ProgressStyle::default_bar).progress_chars("=> "));
    bar
}

/// Installs `pretty_env_logger` (filtered by `RUST_LOG`) behind
/// `indicatif-log-bridge` and returns the [`MultiProgress`] every bar must
/// be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();
    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let max_level = logger.filter();

    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_err()
    {
        log::debug!("Logger already installed");
    }
    log::set_max_level(max_level);

    multi
}

#[cfg(test)]
mod tests {
    use indicatif::ProgressDrawTarget;

    use super::*;

    fn hidden_multi() -> MultiProgress {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn templates_parse() {
        for template in [LOAD_SPINNER_TEMPLATE, LOAD_BAR_TEMPLATE, STAGE_TEMPLATE] {
            assert!(ProgressStyle::with_template(template).is_ok(), "{template}");
        }
    }

    #[test]
    fn stage_bar_counts_stages() {
        let bar = stage_bar(&hidden_multi(), 5);
        bar.inc(2);
        assert_eq!(bar.length(), Some(5));
        assert_eq!(bar.position(), 2);
    }

    #[test]
    fn load_bar_tracks_bytes_and_rows() {
        let bar = ProgressBar::hidden();
        let progress = LoadProgressBar { bar: bar.clone() };

        progress.start("[chicago] loading incidents", Some(4096));
        progress.advance(1024, 10);
        assert_eq!(bar.length(), Some(4096));
        assert_eq!(bar.position(), 1024);
        assert_eq!(bar.prefix(), "10");

        progress.finish("done".to_string());
        assert!(bar.is_finished());
        assert_eq!(bar.message(), "done");
    }
}
