//! Phase: food replenishment, global density and per-player top-up.

use crate::geometry::clamp_to_bounds;
use crate::model::food::Food;
use crate::model::room::Room;
use glam::DVec2;
use rand::Rng;
use std::f64::consts::TAU;

const GLOBAL_FOOD_CAP: f64 = 2000.0;
const NEARBY_RADIUS: f64 = 1500.0;
const CLUSTER_MIN: u32 = 15;
const CLUSTER_MAX: u32 = 55;
const CLUSTER_OFFSET_MIN: f64 = 20.0;
const CLUSTER_OFFSET_MAX: f64 = 100.0;
const TOPUP_RING_MIN: f64 = 900.0;
const TOPUP_RING_MAX: f64 = 1500.0;

/// Returns the number of food items spawned this tick.
pub fn run(room: &mut Room) -> usize {
    let mut spawned = 0;

    let desired = ((room.config.food_coverage_percent / 100.0) * GLOBAL_FOOD_CAP).floor() as usize;
    if room.foods.len() < desired {
        spawned += spawn_cluster(room);
    }

    let target = room.config.food_near_player_target as usize;
    if target > 0 {
        let heads: Vec<DVec2> = room.players.values().map(|p| p.head()).collect();
        for head in heads {
            let nearby = room
                .foods
                .iter()
                .filter(|f| f.position.distance_squared(head) <= NEARBY_RADIUS * NEARBY_RADIUS)
                .count();
            if nearby < target {
                spawned += top_up_around(room, head, target - nearby);
            }
        }
    }

    spawned
}

fn spawn_cluster(room: &mut Room) -> usize {
    let map_half = room.config.map_size;
    let count = room.rng.random_range(CLUSTER_MIN..=CLUSTER_MAX);
    let center = DVec2::new(
        room.rng.random_range(-map_half..=map_half),
        room.rng.random_range(-map_half..=map_half),
    );

    for _ in 0..count {
        let angle = room.rng.random_range(0.0..TAU);
        let radius = room.rng.random_range(CLUSTER_OFFSET_MIN..CLUSTER_OFFSET_MAX);
        let jitter = DVec2::new(room.rng.random_range(-4.0..4.0), room.rng.random_range(-4.0..4.0));
        let position = clamp_to_bounds(
            center + DVec2::new(angle.cos(), angle.sin()) * radius + jitter,
            map_half,
        );
        let value = 1.0 + room.rng.random_range(0.0..3.0);
        let id = room.allocate_food_id();
        room.foods.push(Food { id, position, value });
    }

    count as usize
}

fn top_up_around(room: &mut Room, head: DVec2, deficit: usize) -> usize {
    let map_half = room.config.map_size;
    for _ in 0..deficit {
        let angle = room.rng.random_range(0.0..TAU);
        let dist = room.rng.random_range(TOPUP_RING_MIN..TOPUP_RING_MAX);
        let position = clamp_to_bounds(head + DVec2::new(angle.cos(), angle.sin()) * dist, map_half);
        let id = room.allocate_food_id();
        room.foods.push(Food {
            id,
            position,
            value: 1.0,
        });
    }
    deficit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomConfig;
    use rand::SeedableRng;
    use std::time::Instant;
    use uuid::Uuid;

    #[test]
    fn spawns_cluster_when_below_density_target() {
        let mut room = Room::new(
            Uuid::new_v4(),
            RoomConfig::default(),
            rand::rngs::StdRng::seed_from_u64(11),
            Instant::now(),
        );

        let spawned = run(&mut room);

        assert!(spawned >= CLUSTER_MIN as usize);
        assert_eq!(room.foods.len(), spawned);
    }

    #[test]
    fn no_spawn_when_density_target_already_met() {
        let mut config = RoomConfig::default();
        config.food_coverage_percent = 0.0;
        let mut room = Room::new(
            Uuid::new_v4(),
            config,
            rand::rngs::StdRng::seed_from_u64(11),
            Instant::now(),
        );

        let spawned = run(&mut room);
        assert_eq!(spawned, 0);
        assert!(room.foods.is_empty());
    }
}
