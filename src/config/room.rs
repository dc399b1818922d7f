//! Per-room configuration template: the recognized configuration keys,
//! their validation ranges, and defaults.

use super::defaults::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoomConfig {
    #[serde(default = "default_map_size")]
    pub map_size: f64,
    #[serde(default = "default_max_players")]
    pub max_players: u32,
    #[serde(default = "default_food_coverage_percent")]
    pub food_coverage_percent: f64,
    #[serde(default = "default_food_spawn_rate_per_second")]
    pub food_spawn_rate_per_second: f64,
    #[serde(default = "default_empty_room_ttl_seconds")]
    pub empty_room_ttl_seconds: u64,
    #[serde(default = "default_suction_radius_multiplier")]
    pub suction_radius_multiplier: f64,
    #[serde(default = "default_suction_strength_multiplier")]
    pub suction_strength_multiplier: f64,
    #[serde(default = "default_food_value_multiplier")]
    pub food_value_multiplier: f64,
    #[serde(default = "default_food_near_player_target")]
    pub food_near_player_target: u32,
    #[serde(default = "default_body_radius_multiplier")]
    pub body_radius_multiplier: f64,
    #[serde(default = "default_body_length_multiplier")]
    pub body_length_multiplier: f64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            map_size: default_map_size(),
            max_players: default_max_players(),
            food_coverage_percent: default_food_coverage_percent(),
            food_spawn_rate_per_second: default_food_spawn_rate_per_second(),
            empty_room_ttl_seconds: default_empty_room_ttl_seconds(),
            suction_radius_multiplier: default_suction_radius_multiplier(),
            suction_strength_multiplier: default_suction_strength_multiplier(),
            food_value_multiplier: default_food_value_multiplier(),
            food_near_player_target: default_food_near_player_target(),
            body_radius_multiplier: default_body_radius_multiplier(),
            body_length_multiplier: default_body_length_multiplier(),
        }
    }
}

impl RoomConfig {
    /// Validates every field against its documented range, collecting all
    /// violations rather than bailing on the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let mut check_f64 = |field: &str, value: f64, lo: f64, hi: f64| {
            if !(lo..=hi).contains(&value) {
                errors.push(format!("{field} must be in [{lo}, {hi}], got {value}"));
            }
        };

        check_f64("mapSize", self.map_size, 1000.0, 20000.0);
        check_f64(
            "foodCoveragePercent",
            self.food_coverage_percent,
            0.0,
            50.0,
        );
        check_f64(
            "foodSpawnRatePerSecond",
            self.food_spawn_rate_per_second,
            0.0,
            10000.0,
        );
        check_f64(
            "suctionRadiusMultiplier",
            self.suction_radius_multiplier,
            0.0,
            5.0,
        );
        check_f64(
            "suctionStrengthMultiplier",
            self.suction_strength_multiplier,
            0.0,
            5.0,
        );
        check_f64("foodValueMultiplier", self.food_value_multiplier, 0.0, 10.0);
        check_f64(
            "bodyRadiusMultiplier",
            self.body_radius_multiplier,
            0.0,
            10.0,
        );
        check_f64(
            "bodyLengthMultiplier",
            self.body_length_multiplier,
            0.0,
            10.0,
        );

        if !(2..=500).contains(&self.max_players) {
            errors.push(format!(
                "maxPlayers must be in [2, 500], got {}",
                self.max_players
            ));
        }
        if self.empty_room_ttl_seconds > 3600 {
            errors.push(format!(
                "emptyRoomTtlSeconds must be in [0, 3600], got {}",
                self.empty_room_ttl_seconds
            ));
        }
        if self.food_near_player_target > 400 {
            errors.push(format!(
                "foodNearPlayerTarget must be in [0, 400], got {}",
                self.food_near_player_target
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
