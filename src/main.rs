//! Command line runner: load a table, fit and score a classifier, print the
//! exploration summary and the evaluation report.
//!
//! Usage:
//!   penguin-forest data/penguins_sample.csv
//!   penguin-forest data/penguins_sample.csv data/config.json

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use penguin_forest::data_loading::DataLoaderFactory;
use penguin_forest::exploration::explore;
use penguin_forest::{ClassificationPipelineBuilder, PipelineConfig, PipelineError, Reporter, logging};
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "penguin-forest")]
#[command(about = "Fit and evaluate a species classifier on a tabular dataset")]
#[command(version)]
struct Args {
    /// Data file (.csv, .tsv or .json)
    data: PathBuf,

    /// Optional JSON pipeline configuration
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(stage = err.stage(), "{err}");
            eprintln!("{} failed: {err}", err.stage());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), PipelineError> {
    let config = match &args.config {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::default(),
    };

    let loader = DataLoaderFactory::for_path(&args.data)?;
    let table = loader.load_from_path(&args.data)?;

    let pipeline = ClassificationPipelineBuilder::from_config(&config)?.build()?;
    // The run validates the label before the summary groups by it.
    let report = pipeline.run(&table)?;
    let exploration = explore(&table, pipeline.formula().label())?;

    println!("{}", Reporter::format_exploration(&exploration));
    println!("{}", Reporter::format_report(&report));
    Ok(())
}
