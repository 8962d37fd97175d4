#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the crime visualization toolchain.
//!
//! Loads a crime CSV export, prints exploratory charts to the terminal,
//! draws a stratified sample, and writes four interactive HTML maps.
//!
//! Uses `indicatif-log-bridge` (via [`crime_viz_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod pipeline;

use std::path::PathBuf;

use clap::Parser;
use crime_viz_source::DatasetDefinition;

use crate::pipeline::{PipelineConfig, PipelineStep};

#[derive(Parser)]
#[command(
    name = "crime_viz",
    about = "Explore and map a crime incident CSV export"
)]
struct Cli {
    /// Incident CSV to load (defaults to the dataset's default input)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory the HTML maps are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Dataset definition TOML (defaults to the built-in Chicago layout)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Pipeline step to skip (repeatable)
    #[arg(long, value_enum)]
    skip: Vec<PipelineStep>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crime_viz_cli_utils::init_logger();
    let cli = Cli::parse();

    let definition = match &cli.dataset {
        Some(path) => DatasetDefinition::from_file(path)?,
        None => DatasetDefinition::chicago()?,
    };
    let input = cli
        .input
        .unwrap_or_else(|| PathBuf::from(&definition.default_input));

    log::info!("Dataset: {} ({})", definition.name, definition.id);

    let mut config = PipelineConfig::new(input, cli.output_dir, definition);
    config.skip = cli.skip;

    pipeline::run(&config, &multi)?;

    Ok(())
}
