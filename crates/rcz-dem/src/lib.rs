//! # rcz-dem
//!
//! Single-band elevation raster store backed by 8-bit GeoTIFF files.
//!
//! Samples live in the 0-255 domain. Georeferencing tags found on the input
//! file are kept on the raster so that a derived raster written back to disk
//! lines up with its source in GIS tooling.
//!
//! ## Example
//!
//! ```no_run
//! use rcz_dem::{AtomicOutput, GeoRaster};
//!
//! let input = GeoRaster::from_file("terrain.tif")?;
//! let (width, height) = input.dimensions();
//! println!("{}x{}, center sample {:?}", width, height, input.get(width / 2, height / 2));
//!
//! // Reserve the destination before doing any expensive work.
//! let output = AtomicOutput::create("coverage.tif")?;
//! let result = input.blank_like(0);
//! output.commit(&result)?;
//! # Ok::<(), rcz_dem::DemError>(())
//! ```

mod error;
mod output;
mod raster;
mod tags;

pub use error::DemError;
pub use output::AtomicOutput;
pub use raster::GeoRaster;
pub use tags::GeoTags;

/// Result type for raster operations.
pub type Result<T> = std::result::Result<T, DemError>;
