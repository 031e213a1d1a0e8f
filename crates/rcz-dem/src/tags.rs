//! GeoTIFF georeferencing tags carried from an input raster to its outputs.

use std::io::{Read, Seek, Write};
use tiff::decoder::Decoder;
use tiff::encoder::{DirectoryEncoder, TiffKind};
use tiff::tags::Tag;
use tiff::TiffResult;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const MODEL_TRANSFORMATION: u16 = 34264;
const GEO_KEY_DIRECTORY: u16 = 34735;
const GEO_DOUBLE_PARAMS: u16 = 34736;
const GEO_ASCII_PARAMS: u16 = 34737;
const GDAL_METADATA: u16 = 42112;
const GDAL_NODATA: u16 = 42113;

/// Georeferencing and GDAL metadata tags of a raster.
///
/// Every field is optional: plain TIFF files carry none of them, in which
/// case nothing is written back either.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoTags {
    /// ModelPixelScale: (sx, sy, sz) size of a pixel in model space.
    pub pixel_scale: Option<Vec<f64>>,
    /// ModelTiepoint: one or more (i, j, k, x, y, z) raster/model pairs.
    pub tiepoints: Option<Vec<f64>>,
    /// ModelTransformation: 4x4 row-major affine matrix.
    pub transformation: Option<Vec<f64>>,
    /// GeoKeyDirectory: the GeoKey header and entries.
    pub key_directory: Option<Vec<u16>>,
    /// GeoDoubleParams referenced from the key directory.
    pub double_params: Option<Vec<f64>>,
    /// GeoAsciiParams referenced from the key directory.
    pub ascii_params: Option<String>,
    /// GDAL_METADATA XML blob.
    pub gdal_metadata: Option<String>,
    /// GDAL_NODATA value as text.
    pub gdal_nodata: Option<String>,
}

fn tag(code: u16) -> Tag {
    Tag::from_u16_exhaustive(code)
}

impl GeoTags {
    /// Read whichever georeferencing tags are present on the current image.
    pub fn read<R: Read + Seek>(decoder: &mut Decoder<R>) -> Self {
        Self {
            pixel_scale: decoder.get_tag_f64_vec(tag(MODEL_PIXEL_SCALE)).ok(),
            tiepoints: decoder.get_tag_f64_vec(tag(MODEL_TIEPOINT)).ok(),
            transformation: decoder.get_tag_f64_vec(tag(MODEL_TRANSFORMATION)).ok(),
            key_directory: decoder.get_tag_u16_vec(tag(GEO_KEY_DIRECTORY)).ok(),
            double_params: decoder.get_tag_f64_vec(tag(GEO_DOUBLE_PARAMS)).ok(),
            ascii_params: decoder.get_tag_ascii_string(tag(GEO_ASCII_PARAMS)).ok(),
            gdal_metadata: decoder.get_tag_ascii_string(tag(GDAL_METADATA)).ok(),
            gdal_nodata: decoder.get_tag_ascii_string(tag(GDAL_NODATA)).ok(),
        }
    }

    /// True if no tag is present.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Number of tags present.
    pub fn count(&self) -> usize {
        [
            self.pixel_scale.is_some(),
            self.tiepoints.is_some(),
            self.transformation.is_some(),
            self.key_directory.is_some(),
            self.double_params.is_some(),
            self.ascii_params.is_some(),
            self.gdal_metadata.is_some(),
            self.gdal_nodata.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    /// Write every present tag into the directory of the image being encoded.
    pub fn write<W: Write + Seek, K: TiffKind>(
        &self,
        dir: &mut DirectoryEncoder<'_, W, K>,
    ) -> TiffResult<()> {
        if let Some(values) = &self.pixel_scale {
            dir.write_tag(tag(MODEL_PIXEL_SCALE), &values[..])?;
        }
        if let Some(values) = &self.tiepoints {
            dir.write_tag(tag(MODEL_TIEPOINT), &values[..])?;
        }
        if let Some(values) = &self.transformation {
            dir.write_tag(tag(MODEL_TRANSFORMATION), &values[..])?;
        }
        if let Some(values) = &self.key_directory {
            dir.write_tag(tag(GEO_KEY_DIRECTORY), &values[..])?;
        }
        if let Some(values) = &self.double_params {
            dir.write_tag(tag(GEO_DOUBLE_PARAMS), &values[..])?;
        }
        if let Some(text) = &self.ascii_params {
            dir.write_tag(tag(GEO_ASCII_PARAMS), text.as_str())?;
        }
        if let Some(text) = &self.gdal_metadata {
            dir.write_tag(tag(GDAL_METADATA), text.as_str())?;
        }
        if let Some(text) = &self.gdal_nodata {
            dir.write_tag(tag(GDAL_NODATA), text.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tags() {
        let tags = GeoTags::default();
        assert!(tags.is_empty());
        assert_eq!(tags.count(), 0);
    }

    #[test]
    fn test_count_present_tags() {
        let tags = GeoTags {
            pixel_scale: Some(vec![30.0, 30.0, 0.0]),
            tiepoints: Some(vec![0.0, 0.0, 0.0, 500_000.0, 4_000_000.0, 0.0]),
            gdal_nodata: Some("255".to_string()),
            ..GeoTags::default()
        };
        assert!(!tags.is_empty());
        assert_eq!(tags.count(), 3);
    }
}
