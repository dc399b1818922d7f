//! Wire-level identifier aliases.
//!
//! The canonical definitions live on the model types they identify
//! (`model::room::RoomId`, `model::player::PlayerId`,
//! `model::session::SessionId`); this module just re-exports them under the
//! names the wire layer reaches for, so `protocol::messages` doesn't need to
//! reach into `model` directly.

pub use crate::model::player::PlayerId;
pub use crate::model::room::RoomId;
pub use crate::model::session::SessionId;

/// Milliseconds since an arbitrary monotonic epoch, used for `serverNow` and
/// ping/pong round-trip timing. Never compared across process restarts.
pub type MonotonicMillis = u64;
