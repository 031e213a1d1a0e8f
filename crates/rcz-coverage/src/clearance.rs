//! Line-of-sight clearance and Fresnel zone scoring.
//!
//! Geometry is evaluated in the vertical cross-section through the
//! transmitter and the target: the horizontal axis is planar pixel distance
//! from the transmitter, the vertical axis is elevation.

use crate::profile::GridPoint;

/// Clearance of an obstruction relative to the transmitter-target line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clearance {
    /// Signed perpendicular distance from the obstruction to the line of
    /// sight. Negative when the obstruction is below the line, positive when
    /// it rises above it.
    pub distance: f64,
    /// Distance from the transmitter to the foot of the perpendicular.
    pub r1: f64,
    /// Distance from the foot of the perpendicular to the target.
    pub r2: f64,
}

/// Euclidean distance between two pixels.
pub fn planar_distance(a: GridPoint, b: GridPoint) -> f64 {
    let dx = f64::from(a.x) - f64::from(b.x);
    let dy = f64::from(a.y) - f64::from(b.y);
    (dx * dx + dy * dy).sqrt()
}

/// Compute the clearance of `obstruction` on the path from `transmitter`
/// (raised by `antenna_height`) to `target`.
///
/// Returns `None` when the target coincides with the transmitter, since the
/// line of sight is undefined for a zero-length path.
pub fn clearance(
    transmitter: GridPoint,
    antenna_height: f64,
    obstruction: GridPoint,
    target: GridPoint,
) -> Option<Clearance> {
    let x1 = 0.0;
    let y1 = f64::from(transmitter.z) + antenna_height;
    let x0 = planar_distance(transmitter, obstruction);
    let y0 = f64::from(obstruction.z);
    let x2 = planar_distance(transmitter, target);
    let y2 = f64::from(target.z);

    if x2 == x1 {
        return None;
    }

    // Implicit form a*x + b*y + c = 0 of the transmitter-target line.
    let a = y2 - y1;
    let b = x1 - x2;
    let c = x2 * y1 - x1 * y2;
    let norm = a * a + b * b;

    let line_height = (y2 - y1) * (x0 - x1) / (x2 - x1) + y1;
    let sign = if line_height - y0 < 0.0 { -1.0 } else { 1.0 };
    let distance = -sign * (a * x0 + b * y0 + c).abs() / norm.sqrt();

    // Foot of the perpendicular from the obstruction.
    let xd = (b * (b * x0 - a * y0) - a * c) / norm;
    let yd = (a * (a * y0 - b * x0) - b * c) / norm;

    let r1 = ((xd - x1).powi(2) + (yd - y1).powi(2)).sqrt();
    let r2 = ((x2 - xd).powi(2) + (y2 - yd).powi(2)).sqrt();

    Some(Clearance { distance, r1, r2 })
}

/// First Fresnel zone radius at the point splitting the path into `r1` and
/// `r2`. `None` when the radius is zero or undefined.
pub fn fresnel_radius(wavelength: f64, r1: f64, r2: f64) -> Option<f64> {
    let radius = (wavelength * r1 * r2 / (r1 + r2)).sqrt();
    if radius.is_finite() && radius > 0.0 {
        Some(radius)
    } else {
        None
    }
}

/// Map clearance to a score in `[0, max_score]`.
///
/// The clearance is clamped to one Fresnel radius either way: an obstruction
/// on the line scores half of `max_score`, one radius below it scores
/// `max_score`, one radius above it scores zero.
pub fn quality_score(distance: f64, radius: f64, max_score: u8) -> u8 {
    let d = distance.clamp(-radius, radius);
    let s = radius - d;
    (f64::from(max_score) * (s / (2.0 * radius))).floor() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_planar_distance() {
        let a = GridPoint::new(1, 1, 0);
        let b = GridPoint::new(4, 5, 200);
        assert_relative_eq!(planar_distance(a, b), 5.0);
        assert_eq!(planar_distance(a, a), 0.0);
    }

    #[test]
    fn test_obstruction_on_line() {
        let tx = GridPoint::new(0, 0, 0);
        let hill = GridPoint::new(5, 0, 0);
        let target = GridPoint::new(10, 0, 0);

        let c = clearance(tx, 0.0, hill, target).unwrap();
        assert_eq!(c.distance, 0.0);
        assert_relative_eq!(c.r1, 5.0);
        assert_relative_eq!(c.r2, 5.0);

        let radius = fresnel_radius(1.0, c.r1, c.r2).unwrap();
        assert_eq!(quality_score(c.distance, radius, 200), 100);
    }

    #[test]
    fn test_obstruction_below_line_is_negative() {
        let tx = GridPoint::new(0, 0, 10);
        let hill = GridPoint::new(5, 0, 10);
        let target = GridPoint::new(10, 0, 10);

        // Antenna lifts the line to 20 at the transmitter, 15 above the hill.
        let c = clearance(tx, 10.0, hill, target).unwrap();
        assert!(c.distance < 0.0);
        // Perpendicular distance is 5 * cos(atan(10 / 10)).
        assert_relative_eq!(c.distance, -5.0 / 2f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_obstruction_above_line_is_positive() {
        let tx = GridPoint::new(0, 0, 10);
        let hill = GridPoint::new(0, 4, 30);
        let target = GridPoint::new(0, 8, 10);

        let c = clearance(tx, 0.0, hill, target).unwrap();
        assert_relative_eq!(c.distance, 20.0);
        assert_relative_eq!(c.r1, 4.0);
        assert_relative_eq!(c.r2, 4.0);
    }

    #[test]
    fn test_sub_paths_follow_projection() {
        // Sloped line: foot of the perpendicular is not directly under the hill.
        let tx = GridPoint::new(0, 0, 0);
        let hill = GridPoint::new(3, 0, 10);
        let target = GridPoint::new(10, 0, 10);

        let c = clearance(tx, 0.0, hill, target).unwrap();
        let path = (10f64 * 10.0 + 10.0 * 10.0).sqrt();
        assert_relative_eq!(c.r1 + c.r2, path, epsilon = 1e-9);
        // Projection of (3, 10) onto direction (1, 1) / sqrt(2).
        assert_relative_eq!(c.r1, 13.0 / 2f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(c.distance, 7.0 / 2f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_coincident_target_has_no_clearance() {
        let tx = GridPoint::new(3, 3, 40);
        assert_eq!(clearance(tx, 5.0, tx, tx), None);
    }

    #[test]
    fn test_fresnel_radius() {
        assert_relative_eq!(fresnel_radius(2.0, 4.0, 4.0).unwrap(), 2.0);
        assert_eq!(fresnel_radius(1.0, 0.0, 5.0), None);
        assert_eq!(fresnel_radius(1.0, 0.0, 0.0), None);
        assert_eq!(fresnel_radius(0.0, 3.0, 5.0), None);
    }

    #[test]
    fn test_quality_score_range() {
        assert_eq!(quality_score(-10.0, 2.0, 200), 200);
        assert_eq!(quality_score(-2.0, 2.0, 200), 200);
        assert_eq!(quality_score(0.0, 2.0, 200), 100);
        assert_eq!(quality_score(1.0, 2.0, 200), 50);
        assert_eq!(quality_score(2.0, 2.0, 200), 0);
        assert_eq!(quality_score(99.0, 2.0, 200), 0);
    }
}
