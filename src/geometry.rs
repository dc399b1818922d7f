//! Angle and distance primitives shared by the simulation phases.
//!
//! Positions are tracked as [`glam::DVec2`] world coordinates. Headings are
//! radians normalized into `(-pi, pi]` everywhere they are stored; only the
//! functions in this module are trusted to produce that normalization.

use glam::DVec2;
use std::f64::consts::PI;

/// Wraps an angle into `(-pi, pi]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}

/// Rotates `current` towards `target` by at most `max_delta` (radians, >= 0),
/// taking the shorter signed angular path, and renormalizes the result.
pub fn rotate_towards(current: f64, target: f64, max_delta: f64) -> f64 {
    let diff = wrap_angle(target - current);
    let delta = diff.clamp(-max_delta, max_delta);
    wrap_angle(current + delta)
}

/// Clamps a point into the `[-half_extent, half_extent]^2` square.
pub fn clamp_to_bounds(p: DVec2, half_extent: f64) -> DVec2 {
    DVec2::new(
        p.x.clamp(-half_extent, half_extent),
        p.y.clamp(-half_extent, half_extent),
    )
}

/// Squared distance from point `p` to the segment `a-b`.
pub fn point_segment_distance_sq(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return p.distance_squared(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    let projection = a + ab * t;
    p.distance_squared(projection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_keeps_range() {
        assert!((wrap_angle(0.0) - 0.0).abs() < 1e-9);
        assert!((wrap_angle(PI) - PI).abs() < 1e-9);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-9);
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-9);
        assert!((wrap_angle(-3.0 * PI) - PI).abs() < 1e-9);
    }

    #[test]
    fn rotate_towards_clamps_and_normalizes() {
        let result = rotate_towards(0.0, PI / 2.0, 0.1);
        assert!((result - 0.1).abs() < 1e-9);

        let result = rotate_towards(PI - 0.05, -PI + 0.05, 0.2);
        assert!(result > -PI && result <= PI);
    }

    #[test]
    fn rotate_towards_takes_shorter_path() {
        // from near +pi rotating toward near -pi should move forward (increasing,
        // then wrapping), not backward across the whole circle.
        let result = rotate_towards(3.0, -3.0, 0.5);
        let expected = wrap_angle(3.0 + 0.5);
        assert!((result - expected).abs() < 1e-9);
    }

    #[test]
    fn clamp_to_bounds_respects_extent() {
        let p = clamp_to_bounds(DVec2::new(6000.0, -6000.0), 5000.0);
        assert_eq!(p, DVec2::new(5000.0, -5000.0));
    }

    #[test]
    fn point_segment_distance_matches_endpoint_for_degenerate_segment() {
        let p = DVec2::new(3.0, 4.0);
        let a = DVec2::new(0.0, 0.0);
        let d = point_segment_distance_sq(p, a, a);
        assert!((d - 25.0).abs() < 1e-9);
    }

    #[test]
    fn point_segment_distance_projects_onto_segment() {
        let p = DVec2::new(5.0, 5.0);
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(10.0, 0.0);
        let d = point_segment_distance_sq(p, a, b);
        assert!((d - 25.0).abs() < 1e-9);
    }
}
