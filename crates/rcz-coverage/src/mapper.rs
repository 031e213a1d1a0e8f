//! Per-pixel coverage mapping.

use crate::clearance::{clearance, fresnel_radius, quality_score};
use crate::config::{CoverageConfig, CoverageParams};
use crate::profile::{extract_profile, find_dominant, strip_endpoints, GridPoint};
use crate::Result;
use rayon::prelude::*;
use rcz_dem::{AtomicOutput, GeoRaster};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// The fixed transmitter at the center of the raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transmitter {
    /// Ground cell under the antenna.
    pub ground: GridPoint,
    /// Antenna height above `ground.z`.
    pub antenna_height: f64,
}

impl Transmitter {
    /// Place the transmitter on the integer-truncated center of `raster`.
    pub fn at_center(raster: &GeoRaster, antenna_height: f64) -> Self {
        let (width, height) = raster.dimensions();
        let (x, y) = (width / 2, height / 2);
        let z = raster.get(x, y).unwrap_or_default();
        Self {
            ground: GridPoint { x, y, z },
            antenna_height,
        }
    }

    /// Pixel coordinate of the transmitter.
    pub fn position(&self) -> (u32, u32) {
        (self.ground.x, self.ground.y)
    }
}

/// What happened to a single pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelOutcome {
    /// Input sample was the no-data value.
    NoData,
    /// No obstruction to analyse; the default score applies.
    Unobstructed,
    /// Usable coverage with the computed score.
    Scored(u8),
    /// Computed score fell below the cutoff threshold.
    BelowCutoff(u8),
    /// The Fresnel radius collapsed to zero.
    ZeroFresnel,
}

impl PixelOutcome {
    /// Output sample for this outcome.
    pub fn value(&self, params: &CoverageParams) -> u8 {
        match self {
            PixelOutcome::NoData => params.no_data,
            PixelOutcome::Unobstructed => params.default_score,
            PixelOutcome::Scored(score) => *score,
            PixelOutcome::BelowCutoff(_) | PixelOutcome::ZeroFresnel => params.no_data,
        }
    }
}

/// Score one pixel of `input` against `transmitter`.
pub fn score_pixel(
    x: u32,
    y: u32,
    input: &GeoRaster,
    transmitter: &Transmitter,
    params: &CoverageParams,
) -> PixelOutcome {
    let z = match input.get(x, y) {
        Some(z) if z != params.no_data => z,
        _ => return PixelOutcome::NoData,
    };
    let target = GridPoint { x, y, z };

    let path = extract_profile((x, y), transmitter.position(), input);
    let obstruction = match find_dominant(strip_endpoints(&path)) {
        Some(point) => point,
        None => return PixelOutcome::Unobstructed,
    };

    let geometry = match clearance(
        transmitter.ground,
        transmitter.antenna_height,
        obstruction,
        target,
    ) {
        Some(geometry) => geometry,
        None => return PixelOutcome::Unobstructed,
    };

    let radius = match fresnel_radius(params.wavelength, geometry.r1, geometry.r2) {
        Some(radius) => radius,
        None => return PixelOutcome::ZeroFresnel,
    };

    let score = quality_score(geometry.distance, radius, params.default_score);
    if params.threshold() > f64::from(score) {
        PixelOutcome::BelowCutoff(score)
    } else {
        PixelOutcome::Scored(score)
    }
}

/// Pixel counts per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverageStats {
    pub total: usize,
    pub no_data: usize,
    pub unobstructed: usize,
    pub scored: usize,
    pub below_cutoff: usize,
    pub zero_fresnel: usize,
}

impl CoverageStats {
    pub fn record(&mut self, outcome: PixelOutcome) {
        self.total += 1;
        match outcome {
            PixelOutcome::NoData => self.no_data += 1,
            PixelOutcome::Unobstructed => self.unobstructed += 1,
            PixelOutcome::Scored(_) => self.scored += 1,
            PixelOutcome::BelowCutoff(_) => self.below_cutoff += 1,
            PixelOutcome::ZeroFresnel => self.zero_fresnel += 1,
        }
    }

    pub fn merge(mut self, other: Self) -> Self {
        self.total += other.total;
        self.no_data += other.no_data;
        self.unobstructed += other.unobstructed;
        self.scored += other.scored;
        self.below_cutoff += other.below_cutoff;
        self.zero_fresnel += other.zero_fresnel;
        self
    }

    /// Pixels written with the no-coverage sentinel, excluding no-data input.
    pub fn no_coverage(&self) -> usize {
        self.below_cutoff + self.zero_fresnel
    }

    /// Share of pixels with terrain data that received usable coverage.
    pub fn coverage_fraction(&self) -> f64 {
        let with_data = self.total - self.no_data;
        if with_data == 0 {
            return 0.0;
        }
        (self.unobstructed + self.scored) as f64 / with_data as f64
    }
}

/// Compute the coverage raster for a transmitter at the center of `input`.
///
/// The output has the same dimensions and geo tags as the input. Rows are
/// processed in parallel; each worker reads `input` and writes only its own
/// output row.
pub fn compute_coverage(
    input: &GeoRaster,
    params: &CoverageParams,
) -> Result<(GeoRaster, CoverageStats)> {
    params.validate()?;

    let transmitter = Transmitter::at_center(input, params.elevation);
    if transmitter.ground.z == params.no_data {
        warn!(
            x = transmitter.ground.x,
            y = transmitter.ground.y,
            "transmitter sits on a no-data cell"
        );
    }

    match params.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            Ok(pool.install(|| map_rows(input, &transmitter, params)))
        }
        None => Ok(map_rows(input, &transmitter, params)),
    }
}

fn map_rows(
    input: &GeoRaster,
    transmitter: &Transmitter,
    params: &CoverageParams,
) -> (GeoRaster, CoverageStats) {
    let (width, height) = input.dimensions();
    let mut output = input.blank_like(params.default_score);
    if input.geo_tags().gdal_nodata.is_some() {
        // Output sentinel may differ from whatever the input declared.
        let mut tags = output.geo_tags().clone();
        tags.gdal_nodata = Some(params.no_data.to_string());
        output = output.with_geo_tags(tags);
    }

    info!(
        width,
        height,
        tx_x = transmitter.ground.x,
        tx_y = transmitter.ground.y,
        tx_ground = transmitter.ground.z,
        threads = rayon::current_num_threads(),
        "computing coverage"
    );

    let rows_done = AtomicUsize::new(0);
    let report_interval = std::cmp::max(1, height as usize / 10);
    let start_time = Instant::now();

    let stats = output
        .samples_mut()
        .par_chunks_mut(width as usize)
        .enumerate()
        .map(|(row, cells)| {
            let mut stats = CoverageStats::default();
            for (col, cell) in cells.iter_mut().enumerate() {
                let outcome = score_pixel(col as u32, row as u32, input, transmitter, params);
                *cell = outcome.value(params);
                stats.record(outcome);
            }

            let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
            if done % report_interval == 0 {
                debug!(
                    "  [{:>6}/{:>6}] rows, {:.1}s elapsed",
                    done,
                    height,
                    start_time.elapsed().as_secs_f64()
                );
            }
            stats
        })
        .reduce(CoverageStats::default, CoverageStats::merge);

    info!(
        covered = stats.unobstructed + stats.scored,
        no_coverage = stats.no_coverage(),
        no_data = stats.no_data,
        elapsed_s = start_time.elapsed().as_secs_f64(),
        "coverage complete"
    );

    (output, stats)
}

/// Read the input raster, compute coverage and write the result.
///
/// Both files are opened before any per-pixel work so that I/O problems
/// abort the run early. The output only appears once it is fully written.
pub fn run(config: &CoverageConfig) -> Result<CoverageStats> {
    config.validate()?;

    info!(path = %config.input_path.display(), "loading elevation raster");
    let input = GeoRaster::from_file(&config.input_path)?;
    let output = AtomicOutput::create(&config.output_path)?;

    let (coverage, stats) = compute_coverage(&input, &config.params)?;

    output.commit(&coverage)?;
    info!(path = %config.output_path.display(), "wrote coverage raster");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcz_dem::GeoTags;

    fn flat(width: u32, height: u32, z: u8) -> GeoRaster {
        GeoRaster::new(width, height, z).unwrap()
    }

    #[test]
    fn test_transmitter_at_center() {
        let mut raster = flat(7, 4, 3);
        raster.set(3, 2, 50).unwrap();
        let tx = Transmitter::at_center(&raster, 12.0);
        assert_eq!(tx.ground, GridPoint::new(3, 2, 50));
        assert_eq!(tx.position(), (3, 2));
        assert_eq!(tx.antenna_height, 12.0);
    }

    #[test]
    fn test_no_data_passes_through() {
        let mut raster = flat(9, 9, 20);
        raster.set(1, 7, 255).unwrap();
        let params = CoverageParams::default();
        let tx = Transmitter::at_center(&raster, params.elevation);

        let outcome = score_pixel(1, 7, &raster, &tx, &params);
        assert_eq!(outcome, PixelOutcome::NoData);
        assert_eq!(outcome.value(&params), 255);
    }

    #[test]
    fn test_transmitter_pixel_gets_default_score() {
        let raster = flat(9, 9, 20);
        let params = CoverageParams::default();
        let tx = Transmitter::at_center(&raster, params.elevation);

        let outcome = score_pixel(4, 4, &raster, &tx, &params);
        assert_eq!(outcome, PixelOutcome::Unobstructed);
        assert_eq!(outcome.value(&params), 200);
        // Neighbours have no interior samples either.
        assert_eq!(score_pixel(5, 5, &raster, &tx, &params), PixelOutcome::Unobstructed);
    }

    #[test]
    fn test_ridge_blocks_coverage() {
        // A wall across column 6 between the transmitter (4, 4) and column 8.
        let mut raster = flat(9, 9, 10);
        for y in 0..9 {
            raster.set(6, y, 120).unwrap();
        }
        let params = CoverageParams {
            elevation: 2.0,
            wavelength: 1.0,
            ..CoverageParams::default()
        };
        let tx = Transmitter::at_center(&raster, params.elevation);

        let outcome = score_pixel(8, 4, &raster, &tx, &params);
        assert_eq!(outcome, PixelOutcome::BelowCutoff(0));
        assert_eq!(outcome.value(&params), 255);
    }

    #[test]
    fn test_obstruction_on_line_scores_half() {
        // Transmitter at (4, 4) on ground 0, hill at (6, 4) exactly on the
        // line to a target at (8, 4) that is as high as the hill.
        let mut raster = flat(9, 9, 0);
        raster.set(6, 4, 5).unwrap();
        raster.set(8, 4, 10).unwrap();
        let params = CoverageParams {
            elevation: 0.0,
            wavelength: 1.0,
            ..CoverageParams::default()
        };
        let tx = Transmitter::at_center(&raster, params.elevation);

        assert_eq!(score_pixel(8, 4, &raster, &tx, &params), PixelOutcome::Scored(100));
    }

    #[test]
    fn test_collapsed_fresnel_zone_marks_only_that_pixel() {
        // The perpendicular from the hill at (6, 4) lands exactly on the
        // antenna, so r1 is zero for the target at (8, 4).
        let mut raster = flat(9, 9, 0);
        raster.set(6, 4, 6).unwrap();
        let params = CoverageParams {
            elevation: 4.0,
            wavelength: 1.0,
            ..CoverageParams::default()
        };
        let tx = Transmitter::at_center(&raster, params.elevation);

        let outcome = score_pixel(8, 4, &raster, &tx, &params);
        assert_eq!(outcome, PixelOutcome::ZeroFresnel);
        assert_eq!(outcome.value(&params), 255);

        let (output, stats) = compute_coverage(&raster, &params).unwrap();
        assert_eq!(output.get(8, 4), Some(255));
        assert_eq!(stats.zero_fresnel, 1);
    }

    #[test]
    fn test_output_nodata_tag_matches_sentinel() {
        let tags = GeoTags {
            pixel_scale: Some(vec![30.0, 30.0, 0.0]),
            gdal_nodata: Some("0".to_string()),
            ..GeoTags::default()
        };
        let raster = flat(5, 5, 10).with_geo_tags(tags);
        let params = CoverageParams::default();

        let (output, _) = compute_coverage(&raster, &params).unwrap();
        assert_eq!(output.geo_tags().gdal_nodata.as_deref(), Some("255"));
        assert_eq!(output.geo_tags().pixel_scale, raster.geo_tags().pixel_scale);

        // Inputs without the tag keep their tag set unchanged.
        let (plain, _) = compute_coverage(&flat(5, 5, 10), &params).unwrap();
        assert!(plain.geo_tags().is_empty());
    }

    #[test]
    fn test_stats() {
        let mut stats = CoverageStats::default();
        stats.record(PixelOutcome::NoData);
        stats.record(PixelOutcome::Unobstructed);
        stats.record(PixelOutcome::Scored(150));
        stats.record(PixelOutcome::BelowCutoff(3));

        let mut other = CoverageStats::default();
        other.record(PixelOutcome::ZeroFresnel);

        let merged = stats.merge(other);
        assert_eq!(merged.total, 5);
        assert_eq!(merged.no_coverage(), 2);
        assert_eq!(merged.coverage_fraction(), 0.5);
        assert_eq!(CoverageStats::default().coverage_fraction(), 0.0);
    }
}
