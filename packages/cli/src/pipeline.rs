//! Pipeline orchestrator for the crime visualization toolchain.
//!
//! Chains load -> charts -> sample -> maps in a single run. Each map stage
//! writes one self-contained HTML document into the output directory.
//! Uses `indicatif` progress bars for real-time visual feedback.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::ValueEnum;
use crime_viz_cli_utils::{LoadProgressBar, MultiProgress, stage_bar};
use crime_viz_crime_models::BucketPartition;
use crime_viz_generate::animated::{TimelineSettings, render_animated_map};
use crime_viz_generate::heatmap::{HeatSettings, render_heatmap, render_layered_heatmap};
use crime_viz_generate::markers::render_marker_map;
use crime_viz_generate::{
    MapDocument, MapSettings, OUTPUT_ANIMATED_MAP, OUTPUT_HEATMAP, OUTPUT_LAYERED_HEATMAP,
    OUTPUT_MARKER_MAP, save_document,
};
use crime_viz_sample::{SampleSettings, draw_animation_sample, draw_incident_sample};
use crime_viz_source::{DatasetDefinition, load_incidents};

/// Optional steps of the pipeline. Loading and sampling always run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PipelineStep {
    Charts,
    Markers,
    Heatmap,
    Layers,
    Animation,
}

impl PipelineStep {
    pub const ALL: &[Self] = &[
        Self::Charts,
        Self::Markers,
        Self::Heatmap,
        Self::Layers,
        Self::Animation,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Charts => "Exploratory charts",
            Self::Markers => "Color-coded marker map",
            Self::Heatmap => "Heatmap",
            Self::Layers => "Layered heatmap",
            Self::Animation => "Animated time map",
        }
    }

    /// HTML file written by this step, if any.
    #[must_use]
    pub const fn output_file(self) -> Option<&'static str> {
        match self {
            Self::Charts => None,
            Self::Markers => Some(OUTPUT_MARKER_MAP),
            Self::Heatmap => Some(OUTPUT_HEATMAP),
            Self::Layers => Some(OUTPUT_LAYERED_HEATMAP),
            Self::Animation => Some(OUTPUT_ANIMATED_MAP),
        }
    }
}

/// Everything one pipeline run needs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub definition: DatasetDefinition,
    pub skip: Vec<PipelineStep>,
    pub sample: SampleSettings,
    pub map: MapSettings,
    pub heat: HeatSettings,
    pub timeline: TimelineSettings,
}

impl PipelineConfig {
    /// Config with default sampling and map settings.
    #[must_use]
    pub fn new(input: PathBuf, output_dir: PathBuf, definition: DatasetDefinition) -> Self {
        Self {
            input,
            output_dir,
            definition,
            skip: Vec::new(),
            sample: SampleSettings::default(),
            map: MapSettings::default(),
            heat: HeatSettings::default(),
            timeline: TimelineSettings::default(),
        }
    }

    fn runs(&self, step: PipelineStep) -> bool {
        !self.skip.contains(&step)
    }
}

fn write_output(
    document: &MapDocument,
    dir: &Path,
    step: PipelineStep,
    file_name: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = save_document(document, dir, file_name)?;
    log::info!("{} saved as '{file_name}'", step.label());
    Ok(path)
}

/// Runs the pipeline and returns the paths of the HTML files written.
///
/// The `multi` parameter is the shared [`MultiProgress`] that is also
/// registered with the log bridge, so all `log::info!` output is
/// automatically suspended while progress bars redraw.
///
/// # Errors
///
/// Returns an error if the input cannot be loaded, a chart cannot be
/// printed, or a map document cannot be rendered or written.
pub fn run(
    config: &PipelineConfig,
    multi: &MultiProgress,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let pipeline_start = Instant::now();
    let active: Vec<PipelineStep> = PipelineStep::ALL
        .iter()
        .copied()
        .filter(|step| config.runs(*step))
        .collect();
    let total_steps = active.len() + 2;
    let steps = stage_bar(multi, total_steps as u64);
    steps.set_message("Loading");
    let mut current_step = 0;

    log::info!("Starting pipeline ({total_steps} steps)...");

    // --- Load ---
    current_step += 1;
    log::info!(
        "[{current_step}/{total_steps}] Loading {}...",
        config.input.display()
    );
    let rows = LoadProgressBar::attach(multi);
    let dataset = load_incidents(&config.input, &config.definition, &rows)?;
    steps.inc(1);

    // --- Charts ---
    if config.runs(PipelineStep::Charts) {
        current_step += 1;
        log::info!("[{current_step}/{total_steps}] Plotting exploratory charts...");
        steps.set_message(PipelineStep::Charts.label());
        for chart in crime_viz_analytics::exploratory_charts(&dataset.records) {
            crime_viz_analytics::charts::show(&chart)?;
        }
        steps.inc(1);
    }

    // --- Sample ---
    current_step += 1;
    log::info!("[{current_step}/{total_steps}] Sampling...");
    steps.set_message("Sampling");
    let sample = draw_incident_sample(&dataset.records, &config.sample);
    log::info!(
        "Sample holds {} records ({} minority, {} majority)",
        sample.records.len(),
        sample.minority().len(),
        sample.majority().len()
    );
    steps.inc(1);

    let mut written = Vec::new();
    if active.iter().any(|step| step.output_file().is_some()) {
        fs::create_dir_all(&config.output_dir)?;
    }

    for step in active.iter().copied() {
        let Some(file_name) = step.output_file() else {
            continue;
        };
        current_step += 1;
        log::info!("[{current_step}/{total_steps}] {}...", step.label());
        steps.set_message(step.label());

        let document = match step {
            PipelineStep::Markers => render_marker_map(&sample.records, &config.map)?,
            PipelineStep::Heatmap => {
                render_heatmap(&sample.records, &config.map, &config.heat)?
            }
            PipelineStep::Layers => {
                let partition = BucketPartition::from_records(&sample.records);
                render_layered_heatmap(&partition, &config.map, &config.heat)?
            }
            PipelineStep::Animation => {
                let animation = draw_animation_sample(&sample, &config.sample);
                render_animated_map(&animation, &config.map, &config.timeline)?
            }
            PipelineStep::Charts => continue,
        };

        written.push(write_output(&document, &config.output_dir, step, file_name)?);
        steps.inc(1);
    }

    let elapsed = pipeline_start.elapsed();
    steps.finish_with_message(format!("Done in {:.1}s", elapsed.as_secs_f64()));
    log::info!(
        "Pipeline complete in {:.1}s ({} files written)",
        elapsed.as_secs_f64(),
        written.len()
    );

    Ok(written)
}
