//! The input pipeline: the only place `hello`/`input`/`ping`/`pong` frames
//! get turned into room commands or direct replies. Runs on
//! the connection task, never inside a room actor — anti-spoof and rate
//! limiting are resolved here, against the session registry, before a
//! validated command ever reaches a room.

use crate::metrics::ServerMetrics;
use crate::model::session::SessionId;
use crate::protocol::messages::{ClientMessage, ServerMessage};
use crate::protocol::{validation, ErrorCode};
use crate::server::commands::RoomCommand;
use crate::server::room_manager::RoomManager;
use crate::server::session_registry::SessionRegistry;
use crate::time::monotonic_millis;
use crate::websocket::sending::Outbound;
use std::sync::Arc;
use std::time::Instant;

pub struct InputPipeline {
    room_manager: Arc<RoomManager>,
    session_registry: Arc<SessionRegistry>,
    metrics: Arc<ServerMetrics>,
}

impl InputPipeline {
    pub fn new(
        room_manager: Arc<RoomManager>,
        session_registry: Arc<SessionRegistry>,
        metrics: Arc<ServerMetrics>,
    ) -> Self {
        Self {
            room_manager,
            session_registry,
            metrics,
        }
    }

    pub fn handle(&self, session_id: SessionId, message: ClientMessage) {
        match message {
            ClientMessage::Hello { name } => self.handle_hello(session_id, name),
            ClientMessage::Input {
                player_id,
                direction_rad,
                boosting,
            } => self.handle_input(session_id, player_id, direction_rad, boosting),
            ClientMessage::Ping { ping_id } => self.handle_ping(session_id, ping_id),
            ClientMessage::Pong { ping_id } => self.handle_pong(session_id, ping_id),
        }
    }

    fn handle_hello(&self, session_id: SessionId, raw_name: String) {
        if self.session_registry.room_of(session_id).is_some() {
            return;
        }

        let name = match validation::validate_player_name(&raw_name) {
            Ok(name) => name,
            Err(error) => {
                self.session_registry.send(session_id, Outbound::Frame(ServerMessage::Error { error }));
                return;
            }
        };

        if self.room_manager.is_banned(&name) {
            self.session_registry.send(
                session_id,
                Outbound::Frame(ServerMessage::Error { error: ErrorCode::Banned }),
            );
            return;
        }

        let room_id = self.room_manager.find_or_create_with_slot();
        self.room_manager.send_command(room_id, RoomCommand::Join { session_id, name });
    }

    fn handle_input(
        &self,
        session_id: SessionId,
        player_id: crate::model::player::PlayerId,
        direction_rad: Option<f64>,
        boosting: Option<bool>,
    ) {
        let Some(room_id) = self.session_registry.room_of(session_id) else {
            return;
        };

        if !self.session_registry.owns_player(session_id, player_id) {
            ServerMetrics::inc(&self.metrics.input_spoof_rejected);
            return;
        }

        if !self.session_registry.try_acquire_input_token(session_id, Instant::now()) {
            ServerMetrics::inc(&self.metrics.input_throttled);
            return;
        }

        if let Some(direction_rad) = direction_rad {
            if !direction_rad.is_finite() {
                ServerMetrics::inc(&self.metrics.input_invalid);
                return;
            }
        }

        self.room_manager.send_command(
            room_id,
            RoomCommand::ApplyInput {
                player_id,
                direction_rad,
                boosting,
            },
        );
        ServerMetrics::inc(&self.metrics.input_accepted);
    }

    fn handle_ping(&self, session_id: SessionId, ping_id: Option<u64>) {
        self.session_registry.send(
            session_id,
            Outbound::Frame(ServerMessage::Pong { now: monotonic_millis(), ping_id }),
        );
    }

    fn handle_pong(&self, session_id: SessionId, ping_id: u64) {
        let Some(rtt_ms) = self
            .session_registry
            .record_pong(session_id, ping_id as i64, Instant::now())
        else {
            return;
        };
        self.session_registry.send(
            session_id,
            Outbound::Frame(ServerMessage::Latency { rtt_ms: rtt_ms.max(0) as u64 }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomConfig;

    fn new_pipeline() -> (InputPipeline, Arc<SessionRegistry>) {
        let session_registry = Arc::new(SessionRegistry::new());
        let metrics = Arc::new(ServerMetrics::new());
        let room_manager = RoomManager::new(
            RoomConfig::default(),
            Arc::clone(&session_registry),
            Arc::clone(&metrics),
            20.0,
            20.0,
            64,
        );
        (InputPipeline::new(room_manager, Arc::clone(&session_registry), metrics), session_registry)
    }

    #[tokio::test]
    async fn hello_with_blank_name_yields_error_frame() {
        let (pipeline, session_registry) = new_pipeline();
        let session_id = session_registry.bind_new_session_for_test();

        pipeline.handle_hello(session_id, "   ".to_string());

        assert!(session_registry.room_of(session_id).is_none());
    }

    #[tokio::test]
    async fn input_without_room_binding_is_dropped() {
        let (pipeline, session_registry) = new_pipeline();
        let session_id = session_registry.bind_new_session_for_test();

        pipeline.handle_input(session_id, uuid::Uuid::new_v4(), Some(0.0), None);

        assert_eq!(pipeline.metrics.snapshot().input_accepted, 0);
    }

    #[tokio::test]
    async fn unmatched_pong_produces_no_latency_frame() {
        let (pipeline, session_registry) = new_pipeline();
        let session_id = session_registry.bind_new_session_for_test();

        pipeline.handle_pong(session_id, 999);

        // No panic, no crash; nothing to assert on the outbound channel
        // without a receiver, so this just exercises the miss path.
        assert!(session_registry.room_of(session_id).is_none());
    }
}
