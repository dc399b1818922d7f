//! Process-relative monotonic clock used for `serverNow` and ping/pong
//! timing. Never meaningful across process restarts.

use std::sync::OnceLock;
use std::time::Instant;

static PROCESS_START: OnceLock<Instant> = OnceLock::new();

fn process_start() -> Instant {
    *PROCESS_START.get_or_init(Instant::now)
}

/// Milliseconds elapsed since this process started.
pub fn monotonic_millis() -> u64 {
    u64::try_from(process_start().elapsed().as_millis()).unwrap_or(u64::MAX)
}
