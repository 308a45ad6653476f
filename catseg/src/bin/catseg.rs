//! Batch segmentation of a directory of catalog pages
//!
//! ```text
//! catseg <INPUT_DIR> <OUTPUT_DIR> [--config FILE.toml] [--workers N] [--overlay]
//! ```
//!
//! Logging follows `RUST_LOG` (default `info`).

use catseg::pipeline::{PageProcessor, PipelineResult, SegmenterConfig};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "catseg", version, about = "Segment catalog pages into table cells and photos")]
struct Cli {
    /// Directory of page images (.png, .jpg, .jpeg)
    input: PathBuf,

    /// Directory for JSON records and crops
    output: PathBuf,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of pages processed in parallel
    #[arg(short, long, value_name = "N")]
    workers: Option<usize>,

    /// Write a debug overlay image per page
    #[arg(long)]
    overlay: bool,
}

fn run(cli: &Cli) -> PipelineResult<bool> {
    let mut config = match &cli.config {
        Some(path) => SegmenterConfig::from_toml_file(path)?,
        None => SegmenterConfig::default(),
    };
    if cli.workers.is_some() {
        config.workers = cli.workers;
    }
    if cli.overlay {
        config.overlay = true;
    }

    let processor = PageProcessor::new(&config)?;
    let report = processor.process_dir(&cli.input, &cli.output)?;

    println!("{}", report);
    for failure in &report.failures {
        println!("  skipped {}: {}", failure.path.display(), failure.reason);
    }
    for crop in report.crop_failures() {
        println!("  crop failed {}: {}", crop.file.display(), crop.reason);
    }
    Ok(report.skipped == 0)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!(error = %e, "catseg failed");
            ExitCode::FAILURE
        }
    }
}
