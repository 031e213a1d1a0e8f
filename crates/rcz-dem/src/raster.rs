//! Single-band 8-bit elevation raster.

use crate::{DemError, GeoTags, Result};
use std::io::{Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::ColorType;
use tracing::debug;

/// A single-band raster of 8-bit samples with its georeferencing tags.
///
/// Samples are stored in row-major order; `(x, y)` is (column, row) with the
/// origin at the top-left pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRaster {
    /// Samples in row-major order.
    data: Vec<u8>,
    /// Width of the raster in pixels.
    width: u32,
    /// Height of the raster in pixels.
    height: u32,
    /// Tags copied from the source file, if any.
    tags: GeoTags,
}

impl GeoRaster {
    /// Create a raster with every sample set to `fill`.
    pub fn new(width: u32, height: u32, fill: u8) -> Result<Self> {
        Self::check_shape(width, height)?;
        Ok(Self {
            data: vec![fill; width as usize * height as usize],
            width,
            height,
            tags: GeoTags::default(),
        })
    }

    /// Wrap existing row-major samples.
    pub fn from_samples(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::check_shape(width, height)?;
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(DemError::InvalidRaster(format!(
                "expected {} samples for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            tags: GeoTags::default(),
        })
    }

    /// Load the first image of a TIFF/GeoTIFF file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let mut decoder = Decoder::new(std::io::BufReader::new(file))?;

        // Large DEM extracts overflow the default decoder limits.
        let mut limits = Limits::default();
        limits.decoding_buffer_size = 1024 * 1024 * 1024; // 1 GB
        limits.intermediate_buffer_size = 1024 * 1024 * 1024; // 1 GB
        limits.ifd_value_size = 1024 * 1024 * 1024;
        decoder = decoder.with_limits(limits);

        let (width, height) = decoder.dimensions()?;
        Self::check_shape(width, height)?;

        match decoder.colortype()? {
            ColorType::Gray(_) => {}
            other => {
                return Err(DemError::InvalidRaster(format!(
                    "expected a single-band image, found {:?}",
                    other
                )))
            }
        }

        let tags = GeoTags::read(&mut decoder);
        let data = Self::decode_samples(&mut decoder)?;

        debug!(
            path = %path.display(),
            width,
            height,
            geo_tags = tags.count(),
            "loaded raster"
        );

        let mut raster = Self::from_samples(width, height, data)?;
        raster.tags = tags;
        Ok(raster)
    }

    fn check_shape(width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(DemError::InvalidRaster(format!(
                "raster dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        Ok(())
    }

    /// Decode samples and narrow them to the 0-255 domain.
    fn decode_samples<R: std::io::Read + Seek>(decoder: &mut Decoder<R>) -> Result<Vec<u8>> {
        let result = decoder.read_image()?;

        match result {
            DecodingResult::U8(data) => Ok(data),
            DecodingResult::U16(data) => narrow(data),
            DecodingResult::U32(data) => narrow(data),
            DecodingResult::U64(data) => narrow(data),
            DecodingResult::I8(data) => narrow(data),
            DecodingResult::I16(data) => narrow(data),
            DecodingResult::I32(data) => narrow(data),
            DecodingResult::I64(data) => narrow(data),
            DecodingResult::F32(_) => Err(DemError::UnsupportedDataType("f32".to_string())),
            DecodingResult::F64(_) => Err(DemError::UnsupportedDataType("f64".to_string())),
        }
    }

    /// Get the dimensions of this raster in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Sample at a pixel coordinate, or `None` outside the raster.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[self.index(x, y)])
    }

    /// Overwrite the sample at a pixel coordinate.
    pub fn set(&mut self, x: u32, y: u32, value: u8) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(DemError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let idx = self.index(x, y);
        self.data[idx] = value;
        Ok(())
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Samples in row-major order.
    pub fn samples(&self) -> &[u8] {
        &self.data
    }

    /// Mutable samples in row-major order.
    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Georeferencing tags attached to this raster.
    pub fn geo_tags(&self) -> &GeoTags {
        &self.tags
    }

    /// Replace the georeferencing tags.
    pub fn with_geo_tags(mut self, tags: GeoTags) -> Self {
        self.tags = tags;
        self
    }

    /// A raster with the same dimensions and tags, every sample set to `fill`.
    pub fn blank_like(&self, fill: u8) -> Self {
        Self {
            data: vec![fill; self.data.len()],
            width: self.width,
            height: self.height,
            tags: self.tags.clone(),
        }
    }

    /// Encode as a Gray8 TIFF carrying every present geo tag.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut encoder = TiffEncoder::new(writer)?;
        let mut image = encoder.new_image::<colortype::Gray8>(self.width, self.height)?;
        self.tags.write(image.encoder())?;
        image.write_data(&self.data)?;
        Ok(())
    }

    /// Write to `path` through an [`AtomicOutput`](crate::AtomicOutput).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::AtomicOutput::create(path)?.commit(self)
    }
}

fn narrow<T>(data: Vec<T>) -> Result<Vec<u8>>
where
    T: Copy + Into<i128>,
{
    data.into_iter()
        .enumerate()
        .map(|(index, value)| {
            let wide: i128 = value.into();
            u8::try_from(wide).map_err(|_| DemError::SampleOutOfRange {
                value: wide as i64,
                index,
            })
        })
        .collect()
}
