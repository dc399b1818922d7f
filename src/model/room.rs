use crate::config::room::RoomConfig;
use crate::model::food::{Food, FoodId};
use crate::model::player::{Player, PlayerId};
use rand::rngs::StdRng;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use uuid::Uuid;

pub type RoomId = Uuid;

pub const TICK_DURATION_RING_CAPACITY: usize = 200;

/// A single grid cell of the cached minimap, recomputed every 500ms by the
/// broadcast publisher.
#[derive(Debug, Clone, Copy)]
pub struct MinimapCell {
    pub center_x: f64,
    pub center_y: f64,
    pub sum_value: f64,
    pub count: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct MinimapPlayerEntry {
    pub id: PlayerId,
    pub score_rounded: i64,
    pub x_rounded: i64,
    pub y_rounded: i64,
}

#[derive(Default)]
pub struct MinimapCache {
    pub generated_at: Option<Instant>,
    pub cells: Vec<MinimapCell>,
    pub players: Vec<(MinimapPlayerEntry, String)>,
}

/// An isolated game world: its own configuration, players, and food.
///
/// Lives inside exactly one room actor task; nothing outside that task may
/// mutate a Room's fields directly (see the concurrency notes in
/// `server::room_actor`).
pub struct Room {
    pub id: RoomId,
    pub config: RoomConfig,
    pub players: HashMap<PlayerId, Player>,
    pub foods: Vec<Food>,
    pub next_food_id: FoodId,
    pub next_player_seq: u64,
    pub tick_durations: VecDeque<Duration>,
    pub last_broadcast_at: Option<Instant>,
    pub empty_since: Option<Instant>,
    pub minimap: MinimapCache,
    pub closed: bool,
    pub rng: StdRng,
}

impl Room {
    pub fn new(id: RoomId, config: RoomConfig, rng: StdRng, now: Instant) -> Self {
        Self {
            id,
            config,
            players: HashMap::new(),
            foods: Vec::new(),
            next_food_id: 0,
            next_player_seq: 0,
            tick_durations: VecDeque::with_capacity(TICK_DURATION_RING_CAPACITY),
            last_broadcast_at: None,
            empty_since: Some(now),
            minimap: MinimapCache::default(),
            closed: false,
            rng,
        }
    }

    pub fn allocate_food_id(&mut self) -> FoodId {
        let id = self.next_food_id;
        self.next_food_id += 1;
        id
    }

    pub fn allocate_player_seq(&mut self) -> u64 {
        let seq = self.next_player_seq;
        self.next_player_seq += 1;
        seq
    }

    pub fn record_tick_duration(&mut self, d: Duration) {
        if self.tick_durations.len() >= TICK_DURATION_RING_CAPACITY {
            self.tick_durations.pop_front();
        }
        self.tick_durations.push_back(d);
    }
}
