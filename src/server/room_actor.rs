//! The room actor: one dedicated asynchronous task per room, owning that
//! room's entire mutable state. A bounded command channel is the only way
//! in; the tick and broadcast timers are the only other things that touch
//! it, and both run on the same task.

use crate::broadcast;
use crate::metrics::ServerMetrics;
use crate::model::player::Player;
use crate::model::room::{Room, RoomId};
use crate::protocol::messages::ServerMessage;
use crate::protocol::types::SessionId;
use crate::server::commands::RoomCommand;
use crate::server::session_registry::SessionRegistry;
use crate::simulation;
use crate::websocket::sending::Outbound;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{info, info_span, Instrument};

pub enum CloseReason {
    Manual,
    TimeoutEmpty,
}

/// Spawns the actor task and returns the handle pieces the room manager
/// needs to route work to it without touching `Room` directly.
pub fn spawn(
    room: Room,
    session_registry: Arc<SessionRegistry>,
    metrics: Arc<ServerMetrics>,
    tick_hz: f64,
    broadcast_hz: f64,
    cmd_capacity: usize,
    closed_tx: mpsc::Sender<RoomId>,
) -> (mpsc::Sender<RoomCommand>, Arc<AtomicUsize>, Arc<AtomicBool>) {
    let room_id = room.id;
    let (cmd_tx, cmd_rx) = mpsc::channel(cmd_capacity);
    let player_count = Arc::new(AtomicUsize::new(0));
    let closed_flag = Arc::new(AtomicBool::new(false));

    let player_count_for_task = Arc::clone(&player_count);
    let closed_flag_for_task = Arc::clone(&closed_flag);

    tokio::spawn(
        run(
            room,
            cmd_rx,
            session_registry,
            metrics,
            tick_hz,
            broadcast_hz,
            player_count_for_task,
            closed_flag_for_task,
            closed_tx,
        )
        .instrument(info_span!("room", room_id = %room_id)),
    );

    (cmd_tx, player_count, closed_flag)
}

#[allow(clippy::too_many_arguments)]
async fn run(
    mut room: Room,
    mut cmd_rx: mpsc::Receiver<RoomCommand>,
    session_registry: Arc<SessionRegistry>,
    metrics: Arc<ServerMetrics>,
    tick_hz: f64,
    broadcast_hz: f64,
    player_count: Arc<AtomicUsize>,
    closed_flag: Arc<AtomicBool>,
    closed_tx: mpsc::Sender<RoomId>,
) {
    let mut tick_interval = tokio::time::interval(Duration::from_secs_f64(1.0 / tick_hz));
    let mut broadcast_interval = tokio::time::interval(Duration::from_secs_f64(1.0 / broadcast_hz));
    let dt = 1.0 / tick_hz;
    let ttl = Duration::from_secs(room.config.empty_room_ttl_seconds);

    loop {
        tokio::select! {
            biased;

            Some(command) = cmd_rx.recv() => {
                if handle_command(&mut room, &session_registry, &metrics, &player_count, command) {
                    break;
                }
            }

            _ = tick_interval.tick() => {
                simulation::run_tick(&mut room, &session_registry, &metrics, dt);
                player_count.store(room.players.len(), Ordering::Relaxed);

                if room.players.is_empty() {
                    if room.empty_since.is_none() {
                        room.empty_since = Some(Instant::now());
                    }
                } else {
                    room.empty_since = None;
                }

                if ttl > Duration::ZERO {
                    if let Some(empty_since) = room.empty_since {
                        if empty_since.elapsed() >= ttl {
                            close_room(&mut room, &session_registry, &metrics, CloseReason::TimeoutEmpty);
                            break;
                        }
                    }
                }
            }

            _ = broadcast_interval.tick() => {
                broadcast::publish(&mut room, &session_registry);
            }

            else => break,
        }
    }

    closed_flag.store(true, Ordering::SeqCst);
    let _ = closed_tx.send(room.id).await;
}

/// Returns `true` if the room should stop running.
fn handle_command(
    room: &mut Room,
    session_registry: &SessionRegistry,
    metrics: &ServerMetrics,
    player_count: &AtomicUsize,
    command: RoomCommand,
) -> bool {
    match command {
        RoomCommand::Join { session_id, name } => {
            join_player(room, session_registry, metrics, session_id, name);
            player_count.store(room.players.len(), Ordering::Relaxed);
            false
        }
        RoomCommand::ApplyInput {
            player_id,
            direction_rad,
            boosting,
        } => {
            if let Some(player) = room.players.get_mut(&player_id) {
                if let Some(direction_rad) = direction_rad {
                    player.target_heading = crate::geometry::wrap_angle(direction_rad);
                }
                if let Some(boosting) = boosting {
                    player.boosting = boosting;
                }
            }
            false
        }
        RoomCommand::Leave { player_id } => {
            if let Some(player) = room.players.remove(&player_id) {
                session_registry.unbind(player.session_id);
                ServerMetrics::inc(&metrics.players_left);
            }
            player_count.store(room.players.len(), Ordering::Relaxed);
            false
        }
        RoomCommand::Kick { player_id } => {
            if let Some(player) = room.players.remove(&player_id) {
                session_registry.close(player.session_id, 4000, "kicked");
                session_registry.unbind(player.session_id);
                ServerMetrics::inc(&metrics.players_kicked);
            }
            player_count.store(room.players.len(), Ordering::Relaxed);
            false
        }
        RoomCommand::KickByName { name } => {
            let matching: Vec<_> = room
                .players
                .values()
                .filter(|p| p.name.eq_ignore_ascii_case(&name))
                .map(|p| p.id)
                .collect();
            for player_id in matching {
                if let Some(player) = room.players.remove(&player_id) {
                    session_registry.close(player.session_id, 4001, "banned");
                    session_registry.unbind(player.session_id);
                    ServerMetrics::inc(&metrics.players_banned);
                }
            }
            player_count.store(room.players.len(), Ordering::Relaxed);
            false
        }
        RoomCommand::Close => {
            close_room(room, session_registry, metrics, CloseReason::Manual);
            true
        }
    }
}

fn join_player(
    room: &mut Room,
    session_registry: &SessionRegistry,
    metrics: &ServerMetrics,
    session_id: SessionId,
    name: String,
) {
    if room.players.len() >= room.config.max_players as usize {
        return;
    }

    let player_id = uuid::Uuid::new_v4();
    let spawn = simulation::pick_spawn_position(room);
    let heading = {
        use rand::Rng;
        let raw = room
            .rng
            .random_range(-std::f64::consts::PI..=std::f64::consts::PI);
        crate::geometry::wrap_angle(raw)
    };
    let seq = room.allocate_player_seq();

    let player = Player::new(player_id, session_id, name, spawn, heading, seq);
    room.players.insert(player_id, player);

    session_registry.bind(session_id, room.id, player_id);
    session_registry.send(
        session_id,
        Outbound::Frame(ServerMessage::Joined {
            room_id: room.id,
            player_id,
        }),
    );

    ServerMetrics::inc(&metrics.players_joined);
    info!(room_id = %room.id, %player_id, "player joined");
}

fn close_room(
    room: &mut Room,
    session_registry: &SessionRegistry,
    metrics: &ServerMetrics,
    reason: CloseReason,
) {
    if room.closed {
        return;
    }
    room.closed = true;

    for (_, player) in room.players.drain() {
        session_registry.close(player.session_id, 1000, "room closed");
        session_registry.unbind(player.session_id);
    }

    match reason {
        CloseReason::Manual => {
            ServerMetrics::inc(&metrics.rooms_closed_manual);
            info!(room_id = %room.id, "room closed manually");
        }
        CloseReason::TimeoutEmpty => {
            ServerMetrics::inc(&metrics.rooms_closed_timeout);
            info!(room_id = %room.id, "room closed after empty ttl");
        }
    }
}
