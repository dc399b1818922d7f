//! Commands accepted by a room actor's single entry-point channel. Every
//! mutation to a room's state arrives through here, so the room actor is the
//! only logical writer of that room.

use crate::model::player::PlayerId;
use crate::model::session::SessionId;

pub enum RoomCommand {
    /// A validated `hello`: spawn a new player bound to `session_id`.
    Join {
        session_id: SessionId,
        name: String,
    },
    /// A validated `input` frame, already past the anti-spoof and
    /// rate-limit checks at the registry level.
    ApplyInput {
        player_id: PlayerId,
        direction_rad: Option<f64>,
        boosting: Option<bool>,
    },
    /// A session disconnected (socket closed) while bound to a player here.
    Leave { player_id: PlayerId },
    /// Admin kick of one player.
    Kick { player_id: PlayerId },
    /// A name has just been banned; kick any currently matching player in
    /// this room with code 4001 reason "banned". `name` is already
    /// lowercased.
    KickByName { name: String },
    /// Admin close of the whole room.
    Close,
}
