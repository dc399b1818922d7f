//! The Room Manager: finds or creates rooms, routes commands to their actor
//! tasks, and reacts to self-reported closures.

use crate::config::RoomConfig;
use crate::metrics::ServerMetrics;
use crate::model::room::{Room, RoomId};
use crate::server::commands::RoomCommand;
use crate::server::room_actor;
use crate::server::session_registry::SessionRegistry;
use dashmap::{DashMap, DashSet};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::info;

/// What the manager holds about one live room, without touching its state
/// directly — every mutation goes through `cmd_tx`.
pub struct RoomHandle {
    pub cmd_tx: mpsc::Sender<RoomCommand>,
    pub player_count: Arc<AtomicUsize>,
    pub closed: Arc<AtomicBool>,
    pub max_players: u32,
}

pub struct RoomManager {
    rooms: DashMap<RoomId, RoomHandle>,
    /// Deterministic room iteration order for `findOrCreateWithSlot`,
    /// independent of the map's hashing.
    order: RwLock<Vec<RoomId>>,
    default_config: RwLock<RoomConfig>,
    banned_names: DashSet<String>,
    session_registry: Arc<SessionRegistry>,
    metrics: Arc<ServerMetrics>,
    tick_hz: f64,
    broadcast_hz: f64,
    cmd_capacity: usize,
    closed_tx: mpsc::Sender<RoomId>,
}

impl RoomManager {
    pub fn new(
        default_config: RoomConfig,
        session_registry: Arc<SessionRegistry>,
        metrics: Arc<ServerMetrics>,
        tick_hz: f64,
        broadcast_hz: f64,
        cmd_capacity: usize,
    ) -> Arc<Self> {
        let (closed_tx, mut closed_rx) = mpsc::channel::<RoomId>(64);

        let manager = Arc::new(Self {
            rooms: DashMap::new(),
            order: RwLock::new(Vec::new()),
            default_config: RwLock::new(default_config),
            banned_names: DashSet::new(),
            session_registry,
            metrics,
            tick_hz,
            broadcast_hz,
            cmd_capacity,
            closed_tx,
        });

        let manager_for_reaper = Arc::clone(&manager);
        tokio::spawn(async move {
            while let Some(room_id) = closed_rx.recv().await {
                manager_for_reaper.forget(room_id);
            }
        });

        manager
    }

    /// `findOrCreateWithSlot`: first open room with spare capacity, else a
    /// fresh one from the current default template.
    pub fn find_or_create_with_slot(self: &Arc<Self>) -> RoomId {
        let order = self.order.read().expect("room order lock poisoned").clone();
        for room_id in order {
            if let Some(handle) = self.rooms.get(&room_id) {
                if !handle.closed.load(Ordering::Relaxed)
                    && (handle.player_count.load(Ordering::Relaxed) as u32) < handle.max_players
                {
                    return room_id;
                }
            }
        }

        let config = self.default_config.read().expect("default config lock poisoned").clone();
        self.create(config)
    }

    pub fn create(self: &Arc<Self>, config: RoomConfig) -> RoomId {
        let room_id = uuid::Uuid::new_v4();
        let max_players = config.max_players;
        let rng = StdRng::from_os_rng();
        let room = Room::new(room_id, config, rng, Instant::now());

        let (cmd_tx, player_count, closed) = room_actor::spawn(
            room,
            Arc::clone(&self.session_registry),
            Arc::clone(&self.metrics),
            self.tick_hz,
            self.broadcast_hz,
            self.cmd_capacity,
            self.closed_tx.clone(),
        );

        self.rooms.insert(
            room_id,
            RoomHandle {
                cmd_tx,
                player_count,
                closed,
                max_players,
            },
        );
        self.order.write().expect("room order lock poisoned").push(room_id);

        ServerMetrics::inc(&self.metrics.rooms_created);
        info!(%room_id, "room created");
        room_id
    }

    /// Replaces the template used by future `create` calls; existing rooms
    /// keep their own configuration.
    pub fn set_default_config(&self, config: RoomConfig) {
        *self.default_config.write().expect("default config lock poisoned") = config;
    }

    pub fn default_config(&self) -> RoomConfig {
        self.default_config.read().expect("default config lock poisoned").clone()
    }

    /// Idempotent: returns `false` if the room is already gone.
    pub fn close(&self, room_id: RoomId) -> bool {
        let Some(handle) = self.rooms.get(&room_id) else {
            return false;
        };
        if handle.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        let _ = handle.cmd_tx.try_send(RoomCommand::Close);
        true
    }

    pub fn send_command(&self, room_id: RoomId, command: RoomCommand) -> bool {
        self.rooms
            .get(&room_id)
            .is_some_and(|handle| handle.cmd_tx.try_send(command).is_ok())
    }

    pub fn kick(&self, room_id: RoomId, player_id: crate::model::player::PlayerId) -> bool {
        self.send_command(room_id, RoomCommand::Kick { player_id })
    }

    /// Bans a name process-wide and kicks any currently-online matching
    /// players across every room. Idempotent.
    pub fn ban_name(&self, name: &str) {
        let lowered = name.to_ascii_lowercase();
        self.banned_names.insert(lowered.clone());

        let order = self.order.read().expect("room order lock poisoned").clone();
        for room_id in order {
            self.send_command(room_id, RoomCommand::KickByName { name: lowered.clone() });
        }
    }

    pub fn is_banned(&self, name: &str) -> bool {
        self.banned_names.contains(&name.to_ascii_lowercase())
    }

    /// Drops our handle for a room the actor reported as closed. The actor
    /// task has already exited by the time this runs.
    fn forget(&self, room_id: RoomId) {
        self.rooms.remove(&room_id);
        self.order
            .write()
            .expect("room order lock poisoned")
            .retain(|id| *id != room_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_manager() -> Arc<RoomManager> {
        RoomManager::new(
            RoomConfig::default(),
            Arc::new(SessionRegistry::new()),
            Arc::new(ServerMetrics::new()),
            20.0,
            20.0,
            64,
        )
    }

    #[tokio::test]
    async fn find_or_create_makes_a_room_when_none_exist() {
        let manager = new_manager();
        let room_id = manager.find_or_create_with_slot();
        assert!(manager.rooms.contains_key(&room_id));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let manager = new_manager();
        let room_id = manager.create(RoomConfig::default());
        assert!(manager.close(room_id));
        assert!(!manager.close(room_id));
    }

    #[tokio::test]
    async fn ban_name_is_idempotent() {
        let manager = new_manager();
        manager.ban_name("Troll");
        manager.ban_name("troll");
        assert!(manager.is_banned("TROLL"));
    }
}
