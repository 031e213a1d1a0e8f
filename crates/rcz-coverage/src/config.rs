//! Run configuration.

use crate::{CoverageError, Result};
use std::path::PathBuf;

/// Sample value meaning "no data" on input and "no coverage" on output.
pub const NO_DATA: u8 = 255;

/// Score given to pixels with an unobstructed line of sight.
pub const DEFAULT_SCORE: u8 = 200;

/// Divisor applied to the default score to derive the usability threshold.
pub const DEFAULT_CUTOFF: f64 = 2.7;

/// Tunable parameters of the coverage model.
///
/// Heights, distances and the wavelength share the raster's unit system:
/// pixel steps horizontally and sample steps vertically, unless the caller
/// prepares a raster where both mean the same physical unit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoverageParams {
    /// Antenna height above the transmitter's ground sample.
    pub elevation: f64,
    /// Propagation wavelength.
    pub wavelength: f64,
    /// Pixels scoring below `default_score / cutoff` are marked as having no
    /// coverage.
    pub cutoff: f64,
    /// Score for unobstructed pixels and upper bound of computed scores.
    pub default_score: u8,
    /// Reserved sample value for missing terrain and missing coverage.
    pub no_data: u8,
    /// Worker thread count; `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

impl Default for CoverageParams {
    fn default() -> Self {
        Self {
            elevation: 10.0,
            wavelength: 0.33, // ~900 MHz with metre units
            cutoff: DEFAULT_CUTOFF,
            default_score: DEFAULT_SCORE,
            no_data: NO_DATA,
            threads: None,
        }
    }
}

impl CoverageParams {
    /// Check that the parameters describe a meaningful run.
    pub fn validate(&self) -> Result<()> {
        if !self.elevation.is_finite() {
            return Err(CoverageError::Config(format!(
                "elevation must be finite, got {}",
                self.elevation
            )));
        }
        if !(self.wavelength.is_finite() && self.wavelength > 0.0) {
            return Err(CoverageError::Config(format!(
                "wavelength must be positive, got {}",
                self.wavelength
            )));
        }
        if !(self.cutoff.is_finite() && self.cutoff > 0.0) {
            return Err(CoverageError::Config(format!(
                "cutoff must be positive, got {}",
                self.cutoff
            )));
        }
        // Scores span [0, default_score]; the sentinel has to stay outside.
        if self.default_score >= self.no_data {
            return Err(CoverageError::Config(format!(
                "default score {} must be below the no-data value {}",
                self.default_score, self.no_data
            )));
        }
        if self.threads == Some(0) {
            return Err(CoverageError::Config(
                "thread count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Lowest score still considered usable coverage.
    pub fn threshold(&self) -> f64 {
        f64::from(self.default_score) / self.cutoff
    }
}

/// A complete invocation: where to read, where to write, and how to score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverageConfig {
    /// Elevation raster to read.
    pub input_path: PathBuf,
    /// Coverage raster to write.
    pub output_path: PathBuf,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub params: CoverageParams,
}

impl CoverageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(CoverageError::Config("input path is empty".to_string()));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(CoverageError::Config("output path is empty".to_string()));
        }
        if self.input_path == self.output_path {
            return Err(CoverageError::Config(format!(
                "output would overwrite the input: {}",
                self.input_path.display()
            )));
        }
        self.params.validate()
    }
}
