//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Estimate the radio coverage of a transmitter at the center of an
/// elevation raster.
#[derive(Debug, Parser)]
#[command(name = "rcz", version, about)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute a coverage raster.
    Run(RunArgs),
    /// Describe an elevation raster.
    Info(InfoArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// YAML file with input_path, output_path and model parameters.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Elevation GeoTIFF to read.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Coverage GeoTIFF to write.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Antenna height above the transmitter's ground sample.
    #[arg(short, long)]
    pub elevation: Option<f64>,

    /// Wavelength in raster units.
    #[arg(short, long)]
    pub wavelength: Option<f64>,

    /// Divisor of the default score giving the usability threshold [default: 2.7].
    #[arg(long)]
    pub cutoff: Option<f64>,

    /// Score for unobstructed pixels [default: 200].
    #[arg(long)]
    pub default_score: Option<u8>,

    /// Worker threads (defaults to one per core).
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Write a JSON summary of the run to this file.
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct InfoArgs {
    /// Raster to describe.
    pub path: PathBuf,

    /// Sample value treated as no-data.
    #[arg(long, default_value_t = 255)]
    pub no_data: u8,
}
