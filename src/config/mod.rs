//! Configuration module.
//!
//! - [`types`]: Root `Config` struct
//! - [`server`]: Server timing, rate-limit, and websocket settings
//! - [`room`]: Per-room template (the recognized configuration keys)
//! - [`logging`]: Logging configuration
//! - [`loader`]: Precedence-chained configuration loading
//! - [`validation`]: Range validation and the `ADMIN_TOKEN` startup check
//! - [`defaults`]: Default value functions

pub mod defaults;
pub mod loader;
pub mod logging;
pub mod room;
pub mod server;
pub mod types;
pub mod validation;

pub use loader::load;
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use room::RoomConfig;
pub use server::{RateLimitConfig, ServerConfig, WebSocketConfig};
pub use types::Config;
pub use validation::{require_admin_token, validate_config};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.server.tick_hz, 20.0);
        assert_eq!(config.default_room.map_size, 5000.0);
        assert_eq!(config.logging.dir, "logs");
        assert_eq!(config.logging.rotation, "daily");
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config.port, deserialized.port);
        assert_eq!(config.server.tick_hz, deserialized.server.tick_hz);
        assert_eq!(
            config.default_room.max_players,
            deserialized.default_room.max_players
        );
    }

    #[test]
    fn log_level_display_matches_as_str() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(level.to_string(), level.as_str());
        }
    }
}
