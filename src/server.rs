//! Top-level wiring: the process-wide collaborators assembled into one
//! handle that the websocket layer and admin surface both hold a clone of.

pub mod commands;
pub mod heartbeat;
pub mod input_pipeline;
pub mod room_actor;
pub mod room_manager;
pub mod session_registry;

use crate::config::Config;
use crate::metrics::ServerMetrics;
use crate::model::player::PlayerId;
use crate::model::room::RoomId;
use input_pipeline::InputPipeline;
use room_manager::RoomManager;
use session_registry::SessionRegistry;
use std::sync::Arc;

/// Bounded capacity of each room actor's command channel. Not exposed as a
/// tunable: it bounds in-flight admission work, not game behavior.
const ROOM_COMMAND_CAPACITY: usize = 256;

pub struct GameServer {
    pub config: Config,
    pub room_manager: Arc<RoomManager>,
    pub session_registry: Arc<SessionRegistry>,
    pub metrics: Arc<ServerMetrics>,
    pub input_pipeline: Arc<InputPipeline>,
}

impl GameServer {
    pub fn new(config: Config) -> Arc<Self> {
        let session_registry = Arc::new(SessionRegistry::new());
        let metrics = Arc::new(ServerMetrics::new());
        let room_manager = RoomManager::new(
            config.default_room.clone(),
            Arc::clone(&session_registry),
            Arc::clone(&metrics),
            config.server.tick_hz,
            config.server.broadcast_hz,
            ROOM_COMMAND_CAPACITY,
        );
        let input_pipeline = Arc::new(InputPipeline::new(
            Arc::clone(&room_manager),
            Arc::clone(&session_registry),
            Arc::clone(&metrics),
        ));

        Arc::new(Self {
            config,
            room_manager,
            session_registry,
            metrics,
            input_pipeline,
        })
    }

    /// Spawns the heartbeat/idle-eviction loop as an independent background
    /// task, separate from every room's own tick and broadcast timers.
    pub fn spawn_heartbeat(self: &Arc<Self>) {
        let session_registry = Arc::clone(&self.session_registry);
        let metrics = Arc::clone(&self.metrics);
        let server_config = self.config.server.clone();
        tokio::spawn(heartbeat::run(session_registry, metrics, server_config));
    }

    /// Admin surface, the minimal slice the core needs: kick one player,
    /// ban a name process-wide.
    pub fn kick(&self, room_id: RoomId, player_id: PlayerId) -> bool {
        self.room_manager.kick(room_id, player_id)
    }

    pub fn ban(&self, name: &str) {
        self.room_manager.ban_name(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_server_has_no_rooms_until_a_player_connects() {
        let server = GameServer::new(Config::default());
        assert_eq!(server.metrics.snapshot().rooms_created, 0);
    }
}
