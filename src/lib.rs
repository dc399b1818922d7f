#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_excessive_bools,
    clippy::too_many_arguments,
    clippy::too_many_lines,
    clippy::similar_names
)]

//! # Worm Arena Server
//!
//! Authoritative simulation and broadcast server for a massively
//! multiplayer slithering-worm arcade game. Each room runs on its own
//! actor task; the websocket layer and the input pipeline are the only
//! things that ever reach into a room from outside it.

/// Broadcast publisher: leaderboard, minimap, per-recipient state frames.
pub mod broadcast;

/// Server configuration and environment variables.
pub mod config;

/// Vector and angle helpers shared by simulation and spawn placement.
pub mod geometry;

/// Structured logging configuration.
pub mod logging;

/// Process-wide counters.
pub mod metrics;

/// Room, player, food and session entities.
pub mod model;

/// Wire message protocol definitions.
pub mod protocol;

/// Room actors, the room manager, the input pipeline, and the heartbeat loop.
pub mod server;

/// The simulation tick: motion, food interaction, collision, replenishment.
pub mod simulation;

/// Process-relative monotonic clock.
pub mod time;

/// WebSocket connection handling.
pub mod websocket;
