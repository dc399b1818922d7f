use crate::model::room::RoomId;
use crate::model::session::SessionId;

/// An admin-side observer identity. No admin REST/WS surface currently lets a
/// spectator subscribe to a room, so this type exists so `Room::close` has a
/// real (if always-empty in this build) list to notify and close, matching
/// the rest of the data model.
#[derive(Debug, Clone, Copy)]
pub struct AdminSpectator {
    pub session_id: SessionId,
    pub subscribed_room: Option<RoomId>,
}
