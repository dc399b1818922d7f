//! Orchestrates one simulation tick across four phases, in order: motion,
//! food interaction, collision & death, replenishment.

use super::{collision, food_interaction, motion, replenish};
use crate::geometry::clamp_to_bounds;
use crate::metrics::ServerMetrics;
use crate::model::food::Food;
use crate::model::player::{Player, PlayerId};
use crate::model::room::Room;
use crate::protocol::messages::ServerMessage;
use crate::server::session_registry::SessionRegistry;
use crate::websocket::sending::Outbound;
use glam::DVec2;
use rand::Rng;
use std::time::Instant;

/// Body points kept out of every 4th-point remains drop.
const REMAINS_STRIDE: usize = 4;
const REMAINS_JITTER: f64 = 6.0;

pub fn run_tick(room: &mut Room, session_registry: &SessionRegistry, metrics: &ServerMetrics, dt: f64) {
    let started = Instant::now();

    if !room.players.is_empty() {
        motion::run(room, dt);

        let consumed = food_interaction::run(room, dt);
        ServerMetrics::add(&metrics.food_consumed, consumed as u64);

        let deaths = collision::run(room);
        for death in deaths {
            handle_death(room, session_registry, metrics, death.player_id);
        }

        let spawned = replenish::run(room);
        ServerMetrics::add(&metrics.food_spawned, spawned as u64);
    }

    ServerMetrics::inc(&metrics.ticks_run);
    room.record_tick_duration(started.elapsed());
}

fn handle_death(
    room: &mut Room,
    session_registry: &SessionRegistry,
    metrics: &ServerMetrics,
    player_id: PlayerId,
) {
    let Some(player) = room.players.remove(&player_id) else {
        return;
    };

    let remains_spawned = drop_remains(room, &player);
    ServerMetrics::add(&metrics.food_spawned, remains_spawned as u64);

    session_registry.send(
        player.session_id,
        Outbound::Frame(ServerMessage::Dead {
            final_score: player.score,
        }),
    );
    session_registry.unbind(player.session_id);

    ServerMetrics::inc(&metrics.players_died);

    if room.players.is_empty() {
        room.empty_since = Some(Instant::now());
    }
}

/// Every 4th body point becomes a Food pellet.
fn drop_remains(room: &mut Room, player: &Player) -> usize {
    let body_len = player.body.len();
    let value = (player.score / (body_len.max(10) as f64)).max(0.5);
    let map_half = room.config.map_size;
    let mut spawned = 0;

    for (index, point) in player.body.iter().enumerate() {
        if index % REMAINS_STRIDE != 0 {
            continue;
        }
        let jitter = DVec2::new(
            room.rng.random_range(-REMAINS_JITTER..REMAINS_JITTER),
            room.rng.random_range(-REMAINS_JITTER..REMAINS_JITTER),
        );
        let position = clamp_to_bounds(*point + jitter, map_half);
        let id = room.allocate_food_id();
        room.foods.push(Food { id, position, value });
        spawned += 1;
    }

    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomConfig;
    use crate::model::player::Player;
    use crate::server::session_registry::SessionRegistry;
    use rand::SeedableRng;
    use uuid::Uuid;

    #[tokio::test]
    async fn empty_room_tick_runs_without_players() {
        let mut room = Room::new(
            Uuid::new_v4(),
            RoomConfig::default(),
            rand::rngs::StdRng::seed_from_u64(9),
            Instant::now(),
        );
        let registry = SessionRegistry::new();
        let metrics = ServerMetrics::new();

        run_tick(&mut room, &registry, &metrics, 0.05);

        assert_eq!(metrics.snapshot().ticks_run, 1);
        assert!(room.foods.is_empty());
    }

    #[tokio::test]
    async fn head_to_head_death_removes_player_and_emits_dead_frame() {
        let mut room = Room::new(
            Uuid::new_v4(),
            RoomConfig::default(),
            rand::rngs::StdRng::seed_from_u64(9),
            Instant::now(),
        );
        let registry = SessionRegistry::new();
        let metrics = ServerMetrics::new();

        let mut weak = Player::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "weak".into(),
            glam::DVec2::ZERO,
            0.0,
            0,
        );
        weak.score = 1.0;
        let weak_session = registry.bind_new_session_for_test();
        weak.session_id = weak_session;

        let mut strong = Player::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "strong".into(),
            glam::DVec2::ZERO,
            std::f64::consts::PI,
            1,
        );
        strong.score = 100.0;

        let weak_id = weak.id;
        room.players.insert(weak_id, weak);
        room.players.insert(strong.id, strong);

        run_tick(&mut room, &registry, &metrics, 0.05);

        assert!(!room.players.contains_key(&weak_id));
        assert_eq!(metrics.snapshot().players_died, 1);
    }
}
