//! The heartbeat and idle-eviction loop: two independent timers sharing one
//! task, neither able to starve the other.

use crate::config::ServerConfig;
use crate::metrics::ServerMetrics;
use crate::server::session_registry::SessionRegistry;
use crate::time::monotonic_millis;
use crate::websocket::sending::Outbound;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::debug;

const CLOSE_CODE_INACTIVE: u16 = 4002;

/// Runs until the process exits; there is no graceful shutdown path for
/// this loop because the whole server goes down with it.
pub async fn run(session_registry: Arc<SessionRegistry>, metrics: Arc<ServerMetrics>, config: ServerConfig) {
    let mut ping_tick = interval(Duration::from_secs(config.heartbeat_interval_secs));
    let mut sweep_tick = interval(Duration::from_secs(config.idle_sweep_interval_secs));
    let pong_timeout = Duration::from_secs(config.pong_timeout_secs);
    let inactive_timeout = Duration::from_secs(config.inactive_timeout_secs);

    loop {
        tokio::select! {
            biased;

            _ = ping_tick.tick() => {
                send_pings(&session_registry);
            }
            _ = sweep_tick.tick() => {
                sweep_idle(&session_registry, &metrics, pong_timeout, inactive_timeout);
            }
        }
    }
}

fn send_pings(session_registry: &SessionRegistry) {
    let now = Instant::now();
    let ping_id = monotonic_millis();
    for session_id in session_registry.all_ids() {
        session_registry.send(session_id, Outbound::Frame(crate::protocol::ServerMessage::Ping { ping_id }));
        session_registry.record_ping_sent(session_id, ping_id as i64, now);
    }
}

fn sweep_idle(
    session_registry: &SessionRegistry,
    metrics: &ServerMetrics,
    pong_timeout: Duration,
    inactive_timeout: Duration,
) {
    let now = Instant::now();
    let idle = session_registry.idle_sessions(now, pong_timeout, inactive_timeout);
    for session_id in idle {
        debug!(%session_id, "closing idle session");
        session_registry.close(session_id, CLOSE_CODE_INACTIVE, "inactive");
        ServerMetrics::inc(&metrics.sessions_evicted_idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PONG_TIMEOUT: Duration = Duration::from_secs(30);
    const INACTIVE_TIMEOUT: Duration = Duration::from_secs(600);

    #[tokio::test]
    async fn ping_with_no_sessions_does_nothing() {
        let registry = Arc::new(SessionRegistry::new());
        send_pings(&registry);
        assert!(registry.all_ids().is_empty());
    }

    #[tokio::test]
    async fn fresh_session_is_not_swept_as_idle() {
        let registry = SessionRegistry::new();
        let id = registry.bind_new_session_for_test();
        let idle = registry.idle_sessions(Instant::now(), PONG_TIMEOUT, INACTIVE_TIMEOUT);
        assert!(!idle.contains(&id));
    }

    #[tokio::test]
    async fn sweep_on_empty_registry_increments_nothing() {
        let registry = SessionRegistry::new();
        let metrics = ServerMetrics::new();
        sweep_idle(&registry, &metrics, PONG_TIMEOUT, INACTIVE_TIMEOUT);
        assert_eq!(metrics.snapshot().sessions_evicted_idle, 0);
    }
}
