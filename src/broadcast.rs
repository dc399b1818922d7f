//! The broadcast publisher: leaderboard, minimap cache, and per-recipient
//! payload assembly. Runs inside the room actor's own task, on its own
//! timer — it never suspends mid-assembly.

use crate::model::food::Food;
use crate::model::player::{Player, PlayerId};
use crate::model::room::{MinimapCache, MinimapCell, MinimapPlayerEntry, Room};
use crate::protocol::messages::{
    FoodView, LeaderboardEntry, MinimapCellView, MinimapPayload, MinimapPlayerView, PlayerView,
    ServerMessage, StatePayload,
};
use crate::server::session_registry::SessionRegistry;
use crate::time::monotonic_millis;
use crate::websocket::sending::Outbound;
use std::collections::HashMap;
use std::time::{Duration, Instant};

const LEADERBOARD_SIZE: usize = 10;
const MINIMAP_CELL_SIZE: f64 = 600.0;
const MINIMAP_TOP_CELLS: usize = 200;
const MINIMAP_REFRESH: Duration = Duration::from_millis(500);
const FOOD_VISIBILITY_RADIUS: f64 = 1800.0;
const FOOD_VISIBILITY_CAP: usize = 250;
const PLAYER_VISIBILITY_RADIUS: f64 = 2600.0;
const PLAYER_VISIBILITY_CAP: usize = 40;
const OWN_BODY_TRAILING_POINTS: usize = 180;
const OWN_BODY_STRIDE: usize = 3;

pub fn publish(room: &mut Room, session_registry: &SessionRegistry) {
    if room.players.is_empty() {
        return;
    }

    let leaderboard = build_leaderboard(room);
    refresh_minimap_if_due(room);

    let server_now = monotonic_millis();
    let body_radius_multiplier = room.config.body_radius_multiplier;
    let body_length_multiplier = room.config.body_length_multiplier;
    let minimap_payload = render_minimap(&room.minimap);

    let recipients: Vec<PlayerId> = room.players.keys().copied().collect();

    for recipient_id in recipients {
        let Some(recipient) = room.players.get(&recipient_id) else {
            continue;
        };
        let session_id = recipient.session_id;

        let payload = StatePayload {
            server_now,
            self_player_id: recipient_id,
            body: decimate_body(recipient),
            players: visible_players(room, recipient_id),
            foods: visible_foods(room, recipient),
            leaderboard: leaderboard.clone(),
            minimap: minimap_payload.clone(),
            body_radius_multiplier,
            body_length_multiplier,
        };

        session_registry.send(session_id, Outbound::Frame(ServerMessage::State(Box::new(payload))));
    }

    room.last_broadcast_at = Some(Instant::now());
}

fn build_leaderboard(room: &Room) -> Vec<LeaderboardEntry> {
    let mut players: Vec<&Player> = room.players.values().collect();
    players.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.inserted_seq.cmp(&b.inserted_seq))
    });

    players
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .map(|p| LeaderboardEntry {
            player_id: p.id,
            name: p.name.clone(),
            score: p.score.round(),
        })
        .collect()
}

fn refresh_minimap_if_due(room: &mut Room) {
    let due = match room.minimap.generated_at {
        Some(last) => last.elapsed() >= MINIMAP_REFRESH,
        None => true,
    };
    if !due {
        return;
    }

    room.minimap = compute_minimap(room);
}

fn compute_minimap(room: &Room) -> MinimapCache {
    let mut cells: HashMap<(i64, i64), MinimapCell> = HashMap::new();

    for food in &room.foods {
        let key = cell_key(food.position.x, food.position.y);
        let entry = cells.entry(key).or_insert(MinimapCell {
            center_x: (key.0 as f64 + 0.5) * MINIMAP_CELL_SIZE,
            center_y: (key.1 as f64 + 0.5) * MINIMAP_CELL_SIZE,
            sum_value: 0.0,
            count: 0,
        });
        entry.sum_value += food.value;
        entry.count += 1;
    }

    let mut cells: Vec<MinimapCell> = cells.into_values().collect();
    cells.sort_by(|a, b| {
        b.sum_value
            .partial_cmp(&a.sum_value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    cells.truncate(MINIMAP_TOP_CELLS);

    let players = room
        .players
        .values()
        .map(|p| {
            let head = p.head();
            (
                MinimapPlayerEntry {
                    id: p.id,
                    score_rounded: p.score.round() as i64,
                    x_rounded: head.x.round() as i64,
                    y_rounded: head.y.round() as i64,
                },
                p.name.clone(),
            )
        })
        .collect();

    MinimapCache {
        generated_at: Some(Instant::now()),
        cells,
        players,
    }
}

fn cell_key(x: f64, y: f64) -> (i64, i64) {
    (
        (x / MINIMAP_CELL_SIZE).floor() as i64,
        (y / MINIMAP_CELL_SIZE).floor() as i64,
    )
}

fn render_minimap(cache: &MinimapCache) -> MinimapPayload {
    MinimapPayload {
        cells: cache
            .cells
            .iter()
            .map(|c| MinimapCellView {
                center_x: c.center_x,
                center_y: c.center_y,
                sum_value: c.sum_value,
                count: c.count,
            })
            .collect(),
        players: cache
            .players
            .iter()
            .map(|(entry, name)| MinimapPlayerView {
                id: entry.id,
                name: name.clone(),
                score: entry.score_rounded,
                x: entry.x_rounded,
                y: entry.y_rounded,
            })
            .collect(),
    }
}

fn decimate_body(player: &Player) -> Vec<[f64; 2]> {
    let len = player.body.len();
    let start = len.saturating_sub(OWN_BODY_TRAILING_POINTS);
    player
        .body
        .iter()
        .skip(start)
        .step_by(OWN_BODY_STRIDE)
        .map(|p| [p.x, p.y])
        .collect()
}

fn visible_players(room: &Room, recipient_id: PlayerId) -> Vec<PlayerView> {
    let Some(recipient) = room.players.get(&recipient_id) else {
        return Vec::new();
    };
    let recipient_head = recipient.head();

    let mut views = vec![player_view(recipient)];

    let mut others: Vec<&Player> = room
        .players
        .values()
        .filter(|p| p.id != recipient_id)
        .filter(|p| {
            recipient_head.distance_squared(p.head()) <= PLAYER_VISIBILITY_RADIUS * PLAYER_VISIBILITY_RADIUS
        })
        .collect();
    others.sort_by_key(|p| p.inserted_seq);

    views.extend(
        others
            .into_iter()
            .take(PLAYER_VISIBILITY_CAP.saturating_sub(1))
            .map(player_view),
    );

    views
}

fn player_view(player: &Player) -> PlayerView {
    let head = player.head();
    PlayerView {
        id: player.id,
        name: player.name.clone(),
        score: player.score,
        x: head.x,
        y: head.y,
        heading: player.heading,
        boosting: player.boosting,
    }
}

fn visible_foods(room: &Room, recipient: &Player) -> Vec<FoodView> {
    let head = recipient.head();
    room.foods
        .iter()
        .filter(|f: &&Food| head.distance_squared(f.position) <= FOOD_VISIBILITY_RADIUS * FOOD_VISIBILITY_RADIUS)
        .take(FOOD_VISIBILITY_CAP)
        .map(|f| FoodView {
            id: f.id,
            x: f.position.x,
            y: f.position.y,
            value: f.value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomConfig;
    use glam::DVec2;
    use rand::SeedableRng;
    use uuid::Uuid;

    fn new_room() -> Room {
        Room::new(
            Uuid::new_v4(),
            RoomConfig::default(),
            rand::rngs::StdRng::seed_from_u64(2),
            Instant::now(),
        )
    }

    #[test]
    fn leaderboard_breaks_ties_by_insertion_order() {
        let mut room = new_room();
        let mut first = Player::new(Uuid::new_v4(), Uuid::new_v4(), "first".into(), DVec2::ZERO, 0.0, 0);
        first.score = 10.0;
        let mut second = Player::new(Uuid::new_v4(), Uuid::new_v4(), "second".into(), DVec2::ZERO, 0.0, 1);
        second.score = 10.0;
        let first_id = first.id;
        room.players.insert(first.id, first);
        room.players.insert(second.id, second);

        let leaderboard = build_leaderboard(&room);

        assert_eq!(leaderboard[0].player_id, first_id);
    }

    #[test]
    fn food_outside_visibility_radius_is_excluded() {
        let mut room = new_room();
        let recipient = Player::new(Uuid::new_v4(), Uuid::new_v4(), "r".into(), DVec2::ZERO, 0.0, 0);
        let recipient_id = recipient.id;
        room.players.insert(recipient.id, recipient);
        room.foods.push(Food {
            id: 0,
            position: DVec2::new(1000.0, 0.0),
            value: 1.0,
        });
        room.foods.push(Food {
            id: 1,
            position: DVec2::new(2000.0, 0.0),
            value: 1.0,
        });

        let foods = visible_foods(&room, &room.players[&recipient_id]);
        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].id, 0);
    }

    #[test]
    fn recipient_is_always_first_in_own_visible_players() {
        let mut room = new_room();
        let recipient = Player::new(Uuid::new_v4(), Uuid::new_v4(), "r".into(), DVec2::ZERO, 0.0, 0);
        let recipient_id = recipient.id;
        room.players.insert(recipient.id, recipient);

        let views = visible_players(&room, recipient_id);
        assert_eq!(views[0].id, recipient_id);
    }
}
