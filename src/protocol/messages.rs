//! Wire message shapes. Every frame, in both directions, is a JSON object
//! tagged by a `t` field.

use serde::{Deserialize, Serialize};

use super::error_codes::ErrorCode;
use super::types::{MonotonicMillis, PlayerId, RoomId};

/// Frames a client socket may send. Anything that doesn't parse into one of
/// these variants is a `MALFORMED_FRAME`: dropped silently, `lastMessageAt`
/// still updated by the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "t", rename_all = "lowercase")]
pub enum ClientMessage {
    Hello {
        name: String,
    },
    Input {
        #[serde(rename = "playerId")]
        player_id: PlayerId,
        #[serde(rename = "directionRad", default)]
        direction_rad: Option<f64>,
        #[serde(default)]
        boosting: Option<bool>,
    },
    Ping {
        #[serde(rename = "pingId", default)]
        ping_id: Option<u64>,
    },
    Pong {
        #[serde(rename = "pingId")]
        ping_id: u64,
    },
}

/// Frames the server ever sends to a player socket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "t", rename_all = "lowercase")]
pub enum ServerMessage {
    Welcome {
        #[serde(rename = "serverNow")]
        server_now: MonotonicMillis,
    },
    Joined {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        #[serde(rename = "playerId")]
        player_id: PlayerId,
    },
    Error {
        error: ErrorCode,
    },
    State(Box<StatePayload>),
    Latency {
        #[serde(rename = "rttMs")]
        rtt_ms: u64,
    },
    Ping {
        #[serde(rename = "pingId")]
        ping_id: u64,
    },
    Pong {
        now: MonotonicMillis,
        #[serde(rename = "pingId", skip_serializing_if = "Option::is_none")]
        ping_id: Option<u64>,
    },
    Dead {
        #[serde(rename = "finalScore")]
        final_score: f64,
    },
}

/// The per-recipient `state` payload.
#[derive(Debug, Clone, Serialize)]
pub struct StatePayload {
    #[serde(rename = "serverNow")]
    pub server_now: MonotonicMillis,
    #[serde(rename = "selfPlayerId")]
    pub self_player_id: PlayerId,
    /// The recipient's own body, decimated to at most 60 points. Other
    /// players' bodies are not sent — only their head position — to keep
    /// the per-recipient payload bounded.
    pub body: Vec<[f64; 2]>,
    pub players: Vec<PlayerView>,
    pub foods: Vec<FoodView>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub minimap: MinimapPayload,
    #[serde(rename = "bodyRadiusMultiplier")]
    pub body_radius_multiplier: f64,
    #[serde(rename = "bodyLengthMultiplier")]
    pub body_length_multiplier: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub score: f64,
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub boosting: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodView {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    #[serde(rename = "playerId")]
    pub player_id: PlayerId,
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MinimapPayload {
    pub cells: Vec<MinimapCellView>,
    pub players: Vec<MinimapPlayerView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MinimapCellView {
    #[serde(rename = "centerX")]
    pub center_x: f64,
    #[serde(rename = "centerY")]
    pub center_y: f64,
    #[serde(rename = "sumValue")]
    pub sum_value: f64,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MinimapPlayerView {
    pub id: PlayerId,
    pub name: String,
    pub score: i64,
    pub x: i64,
    pub y: i64,
}
