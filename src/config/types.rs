//! Root configuration types.

use super::defaults::default_port;
use super::logging::LoggingConfig;
use super::room::RoomConfig;
use super::server::ServerConfig;
use serde::{Deserialize, Serialize};

/// Root configuration for the game server process.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub server: ServerConfig,
    /// Template merged into newly-created rooms (`RoomManager::create`).
    #[serde(default)]
    pub default_room: RoomConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            server: ServerConfig::default(),
            default_room: RoomConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
