//! Process-wide, append-only counters. Never reset except at process start.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct ServerMetrics {
    // Input pipeline
    pub input_spoof_rejected: AtomicU64,
    pub input_throttled: AtomicU64,
    pub input_invalid: AtomicU64,
    pub input_accepted: AtomicU64,

    // Room lifecycle
    pub rooms_created: AtomicU64,
    pub rooms_closed_manual: AtomicU64,
    pub rooms_closed_timeout: AtomicU64,

    // Player lifecycle
    pub players_joined: AtomicU64,
    pub players_left: AtomicU64,
    pub players_died: AtomicU64,
    pub players_kicked: AtomicU64,
    pub players_banned: AtomicU64,

    // Simulation
    pub ticks_run: AtomicU64,
    pub food_spawned: AtomicU64,
    pub food_consumed: AtomicU64,

    // Heartbeat
    pub sessions_evicted_idle: AtomicU64,
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ServerMetricsSnapshot {
        ServerMetricsSnapshot {
            input_spoof_rejected: self.input_spoof_rejected.load(Ordering::Relaxed),
            input_throttled: self.input_throttled.load(Ordering::Relaxed),
            input_invalid: self.input_invalid.load(Ordering::Relaxed),
            input_accepted: self.input_accepted.load(Ordering::Relaxed),
            rooms_created: self.rooms_created.load(Ordering::Relaxed),
            rooms_closed_manual: self.rooms_closed_manual.load(Ordering::Relaxed),
            rooms_closed_timeout: self.rooms_closed_timeout.load(Ordering::Relaxed),
            players_joined: self.players_joined.load(Ordering::Relaxed),
            players_left: self.players_left.load(Ordering::Relaxed),
            players_died: self.players_died.load(Ordering::Relaxed),
            players_kicked: self.players_kicked.load(Ordering::Relaxed),
            players_banned: self.players_banned.load(Ordering::Relaxed),
            ticks_run: self.ticks_run.load(Ordering::Relaxed),
            food_spawned: self.food_spawned.load(Ordering::Relaxed),
            food_consumed: self.food_consumed.load(Ordering::Relaxed),
            sessions_evicted_idle: self.sessions_evicted_idle.load(Ordering::Relaxed),
        }
    }

    pub fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }
}

#[derive(Debug, Serialize)]
pub struct ServerMetricsSnapshot {
    pub input_spoof_rejected: u64,
    pub input_throttled: u64,
    pub input_invalid: u64,
    pub input_accepted: u64,
    pub rooms_created: u64,
    pub rooms_closed_manual: u64,
    pub rooms_closed_timeout: u64,
    pub players_joined: u64,
    pub players_left: u64,
    pub players_died: u64,
    pub players_kicked: u64,
    pub players_banned: u64,
    pub ticks_run: u64,
    pub food_spawned: u64,
    pub food_consumed: u64,
    pub sessions_evicted_idle: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let metrics = ServerMetrics::new();
        let snap = metrics.snapshot();
        assert_eq!(snap.rooms_created, 0);
        assert_eq!(snap.input_spoof_rejected, 0);
    }

    #[test]
    fn counters_are_monotonic() {
        let metrics = ServerMetrics::new();
        ServerMetrics::inc(&metrics.input_spoof_rejected);
        ServerMetrics::inc(&metrics.input_spoof_rejected);
        assert_eq!(metrics.snapshot().input_spoof_rejected, 2);
    }
}
