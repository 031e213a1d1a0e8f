//! Errors that can occur while computing a coverage map.

use rcz_dem::DemError;
use thiserror::Error;

/// Fatal errors. Per-pixel conditions never surface here; they are mapped to
/// sentinel values in the output raster instead.
#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Raster error: {0}")]
    Dem(#[from] DemError),

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
