//! Command-line front end for rcz.
//!
//! Resolves a [`CoverageConfig`] from an optional YAML file plus command-line
//! overrides, runs the coverage computation and optionally writes a JSON
//! summary of the run.

mod cli;

pub use cli::{Cli, Command, InfoArgs, RunArgs};

use rcz_coverage::{CoverageConfig, CoverageError, CoverageParams, CoverageStats};
use rcz_dem::{DemError, GeoRaster};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Errors that can occur in the runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Coverage(#[from] CoverageError),

    #[error(transparent)]
    Dem(#[from] DemError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, RunnerError>;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `info`, or `debug` when verbose.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load a configuration file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CoverageConfig> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&text)?)
}

/// Merge the optional config file with command-line values. Flags win.
pub fn resolve_config(args: &RunArgs) -> Result<CoverageConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => CoverageConfig {
            input_path: required_path(&args.input, "--input")?,
            output_path: required_path(&args.output, "--output")?,
            params: CoverageParams::default(),
        },
    };

    if let Some(input) = &args.input {
        config.input_path = input.clone();
    }
    if let Some(output) = &args.output {
        config.output_path = output.clone();
    }

    let params = &mut config.params;
    if let Some(elevation) = args.elevation {
        params.elevation = elevation;
    }
    if let Some(wavelength) = args.wavelength {
        params.wavelength = wavelength;
    }
    if let Some(cutoff) = args.cutoff {
        params.cutoff = cutoff;
    }
    if let Some(default_score) = args.default_score {
        params.default_score = default_score;
    }
    if let Some(threads) = args.threads {
        params.threads = Some(threads);
    }

    config.validate()?;
    Ok(config)
}

fn required_path(value: &Option<PathBuf>, flag: &str) -> Result<PathBuf> {
    value
        .clone()
        .ok_or_else(|| RunnerError::ConfigError(format!("{} is required without --config", flag)))
}

/// Machine-readable record of a finished run.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub input_path: &'a Path,
    pub output_path: &'a Path,
    pub params: &'a CoverageParams,
    pub stats: CoverageStats,
    pub coverage_fraction: f64,
    pub elapsed_s: f64,
}

/// Execute the `run` subcommand.
pub fn run_command(args: &RunArgs) -> Result<CoverageStats> {
    let config = resolve_config(args)?;
    let start = Instant::now();
    let stats = rcz_coverage::run(&config)?;
    let elapsed_s = start.elapsed().as_secs_f64();

    info!(
        "{} pixels, {:.1}% covered, {} without coverage, {} no-data ({:.2}s)",
        stats.total,
        stats.coverage_fraction() * 100.0,
        stats.no_coverage(),
        stats.no_data,
        elapsed_s
    );

    if let Some(path) = &args.summary {
        let summary = RunSummary {
            input_path: &config.input_path,
            output_path: &config.output_path,
            params: &config.params,
            stats,
            coverage_fraction: stats.coverage_fraction(),
            elapsed_s,
        };
        std::fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        info!(path = %path.display(), "wrote run summary");
    }

    Ok(stats)
}

/// Execute the `info` subcommand, returning the printed report.
pub fn info_command(args: &InfoArgs) -> Result<String> {
    let raster = GeoRaster::from_file(&args.path)?;
    let (width, height) = raster.dimensions();
    let samples = raster.samples();

    let no_data = samples.iter().filter(|&&v| v == args.no_data).count();
    let (min, max) = samples
        .iter()
        .filter(|&&v| v != args.no_data)
        .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    let mut report = format!(
        "{}: {}x{} pixels, {} geo tags\n",
        args.path.display(),
        width,
        height,
        raster.geo_tags().count()
    );
    if no_data == samples.len() {
        report.push_str("all samples are no-data\n");
    } else {
        report.push_str(&format!("elevation range: {}..={}\n", min, max));
    }
    report.push_str(&format!("no-data samples: {}\n", no_data));
    report.push_str(&format!(
        "transmitter cell: ({}, {}) = {:?}\n",
        width / 2,
        height / 2,
        raster.get(width / 2, height / 2)
    ));
    Ok(report)
}
