//! Score-derived tuning curves shared across the tick phases. Kept in one
//! place so the formulas aren't transcribed slightly differently in motion,
//! food interaction, and collision.

/// Radians/second a worm can turn at a given score.
pub fn turn_rate(score: f64) -> f64 {
    let t = (score.max(0.0).sqrt() / 80.0).min(1.0);
    (7.0 + (2.2 - 7.0) * t).clamp(2.2, 7.0)
}

/// World units/second, before the boost multiplier.
pub fn base_speed(score: f64) -> f64 {
    220.0 / (1.0 + 0.004 * score.max(0.0))
}

pub const BOOST_SPEED_MULTIPLIER: f64 = 1.55;

/// Target body arc length at a given score.
pub fn target_length(score: f64, body_length_multiplier: f64) -> f64 {
    (120.0 + 2.5 * score.max(0.0)) * body_length_multiplier
}

/// Collision/consumption radius around a player's head.
pub fn body_radius(score: f64, body_radius_multiplier: f64) -> f64 {
    (6.0 + 0.6 * score.max(0.0).sqrt()) * body_radius_multiplier
}

/// Suction radius; zero when suction is disabled by configuration.
pub fn suction_radius(score: f64, suction_radius_multiplier: f64) -> f64 {
    if suction_radius_multiplier <= 0.0 {
        return 0.0;
    }
    let base = 600.0_f64.min(120.0 + 14.0 * score.max(0.0).sqrt());
    (base * suction_radius_multiplier).min(2000.0)
}

/// Speed (world units/second) at which suctioned food is pulled toward a
/// player's head.
pub fn suction_pull_speed(score: f64, suction_strength_multiplier: f64) -> f64 {
    220.0_f64.min(140.0 + 6.0 * score.max(0.0).sqrt()) * suction_strength_multiplier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_rate_bounds() {
        assert!((turn_rate(0.0) - 7.0).abs() < 1e-9);
        assert!(turn_rate(1_000_000.0) >= 2.2 - 1e-9);
    }

    #[test]
    fn suction_radius_disabled_is_zero() {
        assert_eq!(suction_radius(500.0, 0.0), 0.0);
    }

    #[test]
    fn suction_radius_caps_at_2000() {
        assert!(suction_radius(1_000_000.0, 5.0) <= 2000.0);
    }
}
