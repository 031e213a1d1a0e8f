//! # rcz-coverage
//!
//! Ground-level coverage estimation for a fixed transmitter placed at the
//! center of an elevation raster.
//!
//! For every pixel the terrain profile back to the transmitter is walked,
//! the highest sample on it is taken as the dominant obstruction, and the
//! clearance of the line of sight over that obstruction is compared against
//! the first Fresnel zone radius to produce a quality score.
//!
//! ## Features
//!
//! - **Profile extraction**: discrete line walk between two pixels
//! - **Clearance geometry**: signed clearance and Fresnel sub-path lengths
//! - **Coverage mapping**: parallel per-pixel scoring into an output raster
//!
//! ## Example
//!
//! ```no_run
//! use rcz_coverage::{run, CoverageConfig, CoverageParams};
//!
//! let config = CoverageConfig {
//!     input_path: "terrain.tif".into(),
//!     output_path: "coverage.tif".into(),
//!     params: CoverageParams {
//!         elevation: 15.0,
//!         wavelength: 0.33,
//!         ..CoverageParams::default()
//!     },
//! };
//! let stats = run(&config)?;
//! println!("{:.1}% covered", stats.coverage_fraction() * 100.0);
//! # Ok::<(), rcz_coverage::CoverageError>(())
//! ```

mod clearance;
mod config;
mod error;
mod mapper;
mod profile;

pub use clearance::{clearance, fresnel_radius, planar_distance, quality_score, Clearance};
pub use config::{CoverageConfig, CoverageParams, DEFAULT_CUTOFF, DEFAULT_SCORE, NO_DATA};
pub use error::CoverageError;
pub use mapper::{compute_coverage, run, score_pixel, CoverageStats, PixelOutcome, Transmitter};
pub use profile::{extract_profile, find_dominant, strip_endpoints, GridPoint};

/// Result type for coverage operations.
pub type Result<T> = std::result::Result<T, CoverageError>;
