//! Process-wide table of connected sessions. A dedicated connection task
//! owns each session's socket; this registry is
//! the only thing other tasks (room actors, the heartbeat loop) touch.

use crate::model::player::PlayerId;
use crate::model::room::RoomId;
use crate::model::session::Session;
use crate::model::session::SessionId;
use crate::websocket::sending::Outbound;
use dashmap::DashMap;
use std::time::Instant;
use tracing::debug;

#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: Session) {
        self.sessions.insert(session.id, session);
    }

    pub fn remove(&self, id: SessionId) {
        self.sessions.remove(&id);
    }

    /// Binds a session to a room/player pair (successful `hello`).
    pub fn bind(&self, id: SessionId, room_id: RoomId, player_id: PlayerId) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.room_id = Some(room_id);
            session.player_id = Some(player_id);
        }
    }

    /// Clears a session's room/player binding (disconnect, death, kick).
    pub fn unbind(&self, id: SessionId) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.room_id = None;
            session.player_id = None;
        }
    }

    pub fn room_of(&self, id: SessionId) -> Option<RoomId> {
        self.sessions.get(&id).and_then(|s| s.room_id)
    }

    /// The room/player pair a session is currently bound to, if any. Used on
    /// disconnect to route a `Leave` command to the right room actor.
    pub fn binding(&self, id: SessionId) -> Option<(RoomId, PlayerId)> {
        let session = self.sessions.get(&id)?;
        Some((session.room_id?, session.player_id?))
    }

    /// The anti-spoof check: does this session own this player? Resolved
    /// here, at the registry, so the room actor never has to trust a
    /// claimed identity.
    pub fn owns_player(&self, session_id: SessionId, player_id: PlayerId) -> bool {
        self.sessions
            .get(&session_id)
            .is_some_and(|s| s.player_id == Some(player_id))
    }

    /// Best-effort delivery; a full or closed channel drops the frame
    /// rather than blocking the caller.
    pub fn send(&self, id: SessionId, outbound: Outbound) {
        if let Some(session) = self.sessions.get(&id) {
            if session.outbound.try_send(outbound).is_err() {
                debug!(session_id = %id, "outbound channel full or closed, dropping frame");
            }
        }
    }

    pub fn close(&self, id: SessionId, code: u16, reason: &'static str) {
        self.send(id, Outbound::Close { code, reason });
    }

    /// Gates one `input` frame through the session's token bucket.
    pub fn try_acquire_input_token(&self, id: SessionId, now: Instant) -> bool {
        self.sessions
            .get_mut(&id)
            .is_some_and(|mut s| s.bucket.try_acquire(now))
    }

    pub fn touch_last_message(&self, id: SessionId, now: Instant) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.last_message_at = now;
        }
    }

    pub fn record_ping_sent(&self, id: SessionId, ping_id: i64, now: Instant) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.last_ping_sent_at = Some(now);
            session.last_ping_id = Some(ping_id);
        }
    }

    /// Matches a `pong` against the outstanding ping; returns the measured
    /// RTT in milliseconds when it matches.
    pub fn record_pong(&self, id: SessionId, ping_id: i64, now: Instant) -> Option<i64> {
        let mut session = self.sessions.get_mut(&id)?;
        if session.last_ping_id != Some(ping_id) {
            return None;
        }
        let sent_at = session.last_ping_sent_at?;
        let rtt_ms = i64::try_from(now.saturating_duration_since(sent_at).as_millis()).ok()?;
        session.last_pong_at = Some(now);
        session.rtt_ms = Some(rtt_ms);
        Some(rtt_ms)
    }

    /// All currently-registered session ids, for the heartbeat ping fan-out.
    pub fn all_ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }

    /// Sessions whose pong has lagged their last ping beyond
    /// `pong_timeout`, or whose `last_message_at` is older than
    /// `inactive_timeout`. Does not mutate or remove them.
    pub fn idle_sessions(
        &self,
        now: Instant,
        pong_timeout: std::time::Duration,
        inactive_timeout: std::time::Duration,
    ) -> Vec<SessionId> {
        self.sessions
            .iter()
            .filter(|entry| {
                let session = entry.value();
                let pong_lagging = match (session.last_ping_sent_at, session.last_pong_at) {
                    (Some(sent), Some(pong)) => {
                        pong < sent && now.saturating_duration_since(sent) > pong_timeout
                    }
                    (Some(sent), None) => now.saturating_duration_since(sent) > pong_timeout,
                    _ => false,
                };
                let inactive = now.saturating_duration_since(session.last_message_at) > inactive_timeout;
                pong_lagging || inactive
            })
            .map(|entry| *entry.key())
            .collect()
    }

    #[cfg(test)]
    pub fn bind_new_session_for_test(&self) -> SessionId {
        let (tx, _rx) = tokio::sync::mpsc::channel(8);
        let id = uuid::Uuid::new_v4();
        self.insert(Session::new(id, tx, 45.0, 30.0, Instant::now()));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_session() -> (SessionRegistry, SessionId) {
        let registry = SessionRegistry::new();
        let id = registry.bind_new_session_for_test();
        (registry, id)
    }

    #[test]
    fn bind_and_unbind_round_trip() {
        let (registry, id) = registry_with_session();
        let room_id = uuid::Uuid::new_v4();
        let player_id = uuid::Uuid::new_v4();

        registry.bind(id, room_id, player_id);
        assert!(registry.owns_player(id, player_id));

        registry.unbind(id);
        assert!(!registry.owns_player(id, player_id));
    }

    #[test]
    fn owns_player_false_for_unknown_session() {
        let registry = SessionRegistry::new();
        let id = uuid::Uuid::new_v4();
        assert!(!registry.owns_player(id, uuid::Uuid::new_v4()));
    }

    #[test]
    fn pong_without_matching_ping_is_ignored() {
        let (registry, id) = registry_with_session();
        let rtt = registry.record_pong(id, 42, Instant::now());
        assert!(rtt.is_none());
    }

    #[test]
    fn pong_matching_outstanding_ping_yields_rtt() {
        let (registry, id) = registry_with_session();
        registry.record_ping_sent(id, 42, Instant::now());
        let rtt = registry.record_pong(id, 42, Instant::now());
        assert!(rtt.is_some());
    }
}
