//! Error types for the DEM crate.

use thiserror::Error;

/// Errors that can occur when reading or writing elevation rasters.
#[derive(Debug, Error)]
pub enum DemError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding or encoding error.
    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// Unsupported data type in the TIFF file.
    #[error("Unsupported TIFF data type: {0}")]
    UnsupportedDataType(String),

    /// A decoded sample does not fit the 0-255 elevation domain.
    #[error("Sample value {value} at index {index} is outside the 0-255 range")]
    SampleOutOfRange {
        /// Offending value, widened for display.
        value: i64,
        /// Row-major index of the sample.
        index: usize,
    },

    /// Raster shape or layout is not usable.
    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    /// Pixel coordinate is outside the raster.
    #[error("Pixel ({x}, {y}) is outside raster bounds {width}x{height}")]
    OutOfBounds {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Raster width.
        width: u32,
        /// Raster height.
        height: u32,
    },
}
