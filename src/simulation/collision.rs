//! Phase: collision detection and death.

use super::params::body_radius;
use crate::geometry::point_segment_distance_sq;
use crate::model::player::PlayerId;
use crate::model::room::Room;
use std::collections::HashSet;

pub struct DeathEvent {
    pub player_id: PlayerId,
}

/// Body-adjacent points excluded from the collision walk near the head.
const HEAD_EXCLUSION: usize = 12;
/// Stride used while walking a body polyline for collisions.
const WALK_STRIDE: usize = 3;
/// Extra clearance added to the quick-reject radius check.
const QUICK_REJECT_MARGIN: f64 = 200.0;

pub fn run(room: &mut Room) -> Vec<DeathEvent> {
    let body_radius_multiplier = room.config.body_radius_multiplier;

    let mut ids: Vec<PlayerId> = room.players.keys().copied().collect();
    ids.sort_by_key(|id| room.players[id].inserted_seq);

    let mut dead_order: Vec<PlayerId> = Vec::new();
    let mut already_dead: HashSet<PlayerId> = HashSet::new();

    for (i, &a_id) in ids.iter().enumerate() {
        for (j, &b_id) in ids.iter().enumerate() {
            if i == j || already_dead.contains(&a_id) {
                continue;
            }

            let a_head = room.players[&a_id].head();
            let a_score = room.players[&a_id].score;
            let r_a = body_radius(a_score, body_radius_multiplier);

            let b_head = room.players[&b_id].head();
            let b_score = room.players[&b_id].score;
            let r_b = body_radius(b_score, body_radius_multiplier);

            let head_dist_sq = a_head.distance_squared(b_head);
            if head_dist_sq > (r_a + r_b + QUICK_REJECT_MARGIN).powi(2) {
                continue;
            }

            if body_collision(room, a_id, a_head, r_a, b_id, r_b) {
                dead_order.push(a_id);
                already_dead.insert(a_id);
                continue;
            }

            // Head-to-head is symmetric; only resolve it once per unordered
            // pair (when a comes first in the deterministic order).
            if i < j && head_dist_sq < 0.5 * (r_a + r_b).powi(2) {
                let loser = if (a_score - b_score).abs() < f64::EPSILON {
                    let a_seq = room.players[&a_id].inserted_seq;
                    let b_seq = room.players[&b_id].inserted_seq;
                    if a_seq > b_seq {
                        a_id
                    } else {
                        b_id
                    }
                } else if a_score < b_score {
                    a_id
                } else {
                    b_id
                };

                if !already_dead.contains(&loser) {
                    dead_order.push(loser);
                    already_dead.insert(loser);
                }
            }
        }
    }

    dead_order
        .into_iter()
        .map(|player_id| DeathEvent { player_id })
        .collect()
}

fn body_collision(
    room: &Room,
    a_id: PlayerId,
    a_head: glam::DVec2,
    r_a: f64,
    b_id: PlayerId,
    r_b: f64,
) -> bool {
    let _ = a_id;
    let b_body = &room.players[&b_id].body;
    let len = b_body.len();
    if len <= HEAD_EXCLUSION {
        return false;
    }

    let thickness = (r_b * 0.6).max(3.0);
    let limit = len - HEAD_EXCLUSION;
    let mut k = 0;
    while k < limit {
        let seg_start = b_body[k];
        let seg_end_idx = (k + 1).min(len.saturating_sub(HEAD_EXCLUSION + 1));
        let seg_end = b_body[seg_end_idx];
        let dist_sq = point_segment_distance_sq(a_head, seg_start, seg_end);
        if dist_sq < (r_a + thickness).powi(2) {
            return true;
        }
        k += WALK_STRIDE;
    }
    false
}
