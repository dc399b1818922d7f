//! Phase 1 of the tick: heading integration, movement, body trim, boost
//! decay.

use super::params::{base_speed, target_length, turn_rate, BOOST_SPEED_MULTIPLIER};
use crate::geometry::{clamp_to_bounds, rotate_towards};
use crate::model::food::Food;
use crate::model::player::Player;
use crate::model::room::Room;
use glam::DVec2;
use rand::Rng;

pub fn run(room: &mut Room, dt: f64) {
    let map_half = room.config.map_size;
    let body_length_multiplier = room.config.body_length_multiplier;

    let mut dropped_food_positions = Vec::new();

    for player in room.players.values_mut() {
        let max_turn = turn_rate(player.score) * dt;
        player.heading = rotate_towards(player.heading, player.target_heading, max_turn);

        let mut speed = base_speed(player.score);
        if player.boosting {
            speed *= BOOST_SPEED_MULTIPLIER;
        }

        let delta = DVec2::new(player.heading.cos(), player.heading.sin()) * speed * dt;
        let new_head = clamp_to_bounds(player.head() + delta, map_half);
        player.body.push_back(new_head);

        trim_body(player, target_length(player.score, body_length_multiplier));

        if player.boosting && player.score > 1.0 {
            let decay = (0.002 * player.score).clamp(0.1, 1.5);
            player.score = (player.score - decay).max(0.0);
        }
    }

    // Boost food drops use the room's shared PRNG, so they run in a second
    // pass once the per-player borrow above has ended.
    let boosting_heads: Vec<DVec2> = room
        .players
        .values()
        .filter(|p| p.boosting && p.score > 1.0)
        .map(Player::head)
        .collect();

    for head in boosting_heads {
        if room.rng.random_bool(0.3) {
            let jitter = DVec2::new(room.rng.random_range(-4.0..4.0), room.rng.random_range(-4.0..4.0));
            dropped_food_positions.push(head + jitter);
        }
    }

    for position in dropped_food_positions {
        let id = room.allocate_food_id();
        room.foods.push(Food {
            id,
            position,
            value: 0.5,
        });
    }
}

fn trim_body(player: &mut Player, target_len: f64) {
    while player.body.len() > 1 && player.arc_length() > target_len {
        player.body.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomConfig;
    use crate::model::player::Player;
    use rand::SeedableRng;
    use std::time::Instant;
    use uuid::Uuid;

    fn new_room() -> Room {
        Room::new(
            Uuid::new_v4(),
            RoomConfig::default(),
            rand::rngs::StdRng::seed_from_u64(1),
            Instant::now(),
        )
    }

    #[test]
    fn head_advances_along_heading() {
        let mut room = new_room();
        let player = Player::new(Uuid::new_v4(), Uuid::new_v4(), "a".into(), DVec2::ZERO, 0.0, 0);
        let id = player.id;
        room.players.insert(id, player);

        run(&mut room, 0.05);

        let head = room.players[&id].head();
        assert!(head.x > 0.0);
        assert!(head.y.abs() < 1e-6);
    }

    #[test]
    fn clamps_to_map_bounds() {
        let mut room = new_room();
        let map_half = room.config.map_size;
        let player = Player::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "a".into(),
            DVec2::new(map_half - 1.0, 0.0),
            0.0,
            0,
        );
        let id = player.id;
        room.players.insert(id, player);

        run(&mut room, 1.0);

        let head = room.players[&id].head();
        assert!(head.x <= map_half);
    }

    #[test]
    fn body_trims_to_target_length() {
        let mut room = new_room();
        let mut player = Player::new(Uuid::new_v4(), Uuid::new_v4(), "a".into(), DVec2::ZERO, 0.0, 0);
        player.score = 0.0;
        let id = player.id;
        room.players.insert(id, player);

        for _ in 0..2000 {
            run(&mut room, 0.05);
        }

        let player = &room.players[&id];
        let max_segment = 220.0 * 0.05;
        assert!(player.arc_length() <= target_length(player.score, 1.0) + max_segment + 1.0);
    }
}
