//! Server-wide timing and resource-limit configuration (distinct from the
//! per-room template in `config::room`).

use super::defaults::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Simulation tick rate in Hz.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: f64,
    /// Broadcast publisher rate in Hz; conforming range is [5, 20].
    #[serde(default = "default_broadcast_hz")]
    pub broadcast_hz: f64,
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,
    #[serde(default = "default_idle_sweep_interval_secs")]
    pub idle_sweep_interval_secs: u64,
    #[serde(default = "default_pong_timeout_secs")]
    pub pong_timeout_secs: u64,
    #[serde(default = "default_inactive_timeout_secs")]
    pub inactive_timeout_secs: u64,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub websocket: WebSocketConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick_hz: default_tick_hz(),
            broadcast_hz: default_broadcast_hz(),
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            idle_sweep_interval_secs: default_idle_sweep_interval_secs(),
            pong_timeout_secs: default_pong_timeout_secs(),
            inactive_timeout_secs: default_inactive_timeout_secs(),
            rate_limit: RateLimitConfig::default(),
            websocket: WebSocketConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if !(5.0..=20.0).contains(&self.broadcast_hz) {
            errors.push(format!(
                "server.broadcast_hz must be in [5, 20], got {}",
                self.broadcast_hz
            ));
        }
        if self.tick_hz <= 0.0 {
            errors.push("server.tick_hz must be positive".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Token bucket parameters for the input pipeline's per-session admission
/// gate (capacity 45, refill 30/s by default).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_token_bucket_capacity")]
    pub token_bucket_capacity: f64,
    #[serde(default = "default_token_bucket_refill_per_sec")]
    pub token_bucket_refill_per_sec: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            token_bucket_capacity: default_token_bucket_capacity(),
            token_bucket_refill_per_sec: default_token_bucket_refill_per_sec(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebSocketConfig {
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    #[serde(default = "default_outbound_channel_capacity")]
    pub outbound_channel_capacity: usize,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            max_message_size: default_max_message_size(),
            outbound_channel_capacity: default_outbound_channel_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_server_config_is_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn broadcast_hz_out_of_range_is_rejected() {
        let config = ServerConfig {
            broadcast_hz: 1.0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn broadcast_hz_conforming_range_endpoints_are_accepted() {
        for hz in [5.0, 20.0] {
            let config = ServerConfig {
                broadcast_hz: hz,
                ..ServerConfig::default()
            };
            assert!(config.validate().is_ok());
        }
    }
}
