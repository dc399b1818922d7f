//! Phase: food consumption and suction.

use super::params::{body_radius, suction_pull_speed, suction_radius};
use crate::model::player::PlayerId;
use crate::model::room::Room;
use std::collections::HashSet;

/// Returns the number of food items consumed this tick.
pub fn run(room: &mut Room, dt: f64) -> usize {
    let body_radius_multiplier = room.config.body_radius_multiplier;
    let suction_radius_multiplier = room.config.suction_radius_multiplier;
    let suction_strength_multiplier = room.config.suction_strength_multiplier;
    let food_value_multiplier = room.config.food_value_multiplier;

    let mut order: Vec<PlayerId> = room.players.keys().copied().collect();
    order.sort_by_key(|id| room.players[id].inserted_seq);

    let mut eaten_ids = Vec::new();

    for food in &mut room.foods {
        for &player_id in &order {
            let head = room.players[&player_id].head();
            let score = room.players[&player_id].score;
            let dist_sq = food.position.distance_squared(head);

            let r = body_radius(score, body_radius_multiplier);
            if dist_sq <= r * r {
                if let Some(player) = room.players.get_mut(&player_id) {
                    player.score += food.value * food_value_multiplier;
                }
                eaten_ids.push(food.id);
                break;
            }

            let s = suction_radius(score, suction_radius_multiplier);
            if s > 0.0 && dist_sq <= s * s {
                let d = dist_sq.sqrt().max(1e-6);
                let pull = suction_pull_speed(score, suction_strength_multiplier);
                let step = (pull * dt / d).min(1.0);
                food.position += (head - food.position) * step;
            }
        }
    }

    if eaten_ids.is_empty() {
        return 0;
    }

    let eaten: HashSet<u64> = eaten_ids.into_iter().collect();
    let consumed = eaten.len();
    room.foods.retain(|f| !eaten.contains(&f.id));
    consumed
}
