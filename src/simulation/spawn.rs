//! Spawn placement used by the `hello` handler.

use crate::model::room::Room;
use glam::DVec2;
use rand::Rng;

const CANDIDATE_COUNT: usize = 20;
const MIN_CLEARANCE: f64 = 900.0;

/// Picks a spawn position: 20 random candidates, the first whose minimum
/// squared distance to any existing player's head exceeds `MIN_CLEARANCE`
/// squared, or failing that the candidate with the largest such minimum.
pub fn pick_spawn_position(room: &mut Room) -> DVec2 {
    let bound = (room.config.map_size - 200.0).max(0.0);
    let min_clearance_sq = MIN_CLEARANCE * MIN_CLEARANCE;

    let mut best: Option<(DVec2, f64)> = None;

    for _ in 0..CANDIDATE_COUNT {
        let candidate = DVec2::new(
            room.rng.random_range(-bound..=bound),
            room.rng.random_range(-bound..=bound),
        );

        let min_dist_sq = room
            .players
            .values()
            .map(|p| candidate.distance_squared(p.head()))
            .fold(f64::INFINITY, f64::min);

        if min_dist_sq > min_clearance_sq {
            return candidate;
        }

        let should_replace = match best {
            Some((_, best_dist)) => min_dist_sq > best_dist,
            None => true,
        };
        if should_replace {
            best = Some((candidate, min_dist_sq));
        }
    }

    best.map_or(DVec2::ZERO, |(position, _)| position)
}
