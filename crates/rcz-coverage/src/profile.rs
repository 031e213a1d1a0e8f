//! Terrain profile extraction between a target pixel and the transmitter.

use rcz_dem::GeoRaster;

/// A raster cell together with its elevation sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPoint {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Elevation sample.
    pub z: u8,
}

impl GridPoint {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }
}

/// Walk the discrete line between `target` and `transmitter`.
///
/// Exactly one sample is taken per integer step along the dominant axis
/// (the axis with the larger extent, `y` on ties). The minor coordinate is
/// the real-valued interpolation truncated to its pixel. The walk starts at
/// whichever endpoint has the smaller dominant coordinate and includes both
/// endpoints; use [`strip_endpoints`] to drop them.
///
/// Both endpoints must lie inside `raster`.
pub fn extract_profile(
    target: (u32, u32),
    transmitter: (u32, u32),
    raster: &GeoRaster,
) -> Vec<GridPoint> {
    let dx = target.0.abs_diff(transmitter.0);
    let dy = target.1.abs_diff(transmitter.1);
    let x_major = dx > dy;

    // Orient as (major, minor) so one walk handles both axes.
    let orient = |p: (u32, u32)| if x_major { p } else { (p.1, p.0) };
    let (target_o, transmitter_o) = (orient(target), orient(transmitter));
    let (start, finish) = if target_o.0 < transmitter_o.0 {
        (target_o, transmitter_o)
    } else {
        (transmitter_o, target_o)
    };

    let major_len = u64::from(finish.0 - start.0);
    let minor_len = u64::from(start.1.abs_diff(finish.1));
    let ascending = finish.1 >= start.1;

    let mut points = Vec::with_capacity(major_len as usize + 1);
    for k in 0..=major_len {
        let major = start.0 + k as u32;
        // Exact truncation of start + k * minor_len / major_len. Accumulating
        // a float step instead drifts just below whole values on long lines
        // (1 + 3 * (1/3) truncates to 1), shifting a cell off the true line.
        let minor = if major_len == 0 {
            start.1
        } else if ascending {
            start.1 + (k * minor_len / major_len) as u32
        } else {
            start.1 - (k * minor_len).div_ceil(major_len) as u32
        };

        let (x, y) = if x_major { (major, minor) } else { (minor, major) };
        if let Some(z) = raster.get(x, y) {
            points.push(GridPoint { x, y, z });
        }
    }

    points
}

/// Drop the first and last entries of a walked line.
///
/// Those are the target and the transmitter themselves, which must never be
/// treated as obstructions.
pub fn strip_endpoints(points: &[GridPoint]) -> &[GridPoint] {
    match points.len() {
        0 | 1 | 2 => &[],
        n => &points[1..n - 1],
    }
}

/// The highest point of a profile. Ties go to the first such point.
pub fn find_dominant(profile: &[GridPoint]) -> Option<GridPoint> {
    profile.iter().fold(None, |best, point| match best {
        Some(best) if point.z <= best.z => Some(best),
        _ => Some(*point),
    })
}
