use crate::model::player::PlayerId;
use crate::model::room::RoomId;
use crate::websocket::sending::Outbound;
use std::time::Instant;
use tokio::sync::mpsc;
use uuid::Uuid;

pub type SessionId = Uuid;

/// Token bucket gating `input` frames: capacity 45, refill 30/s.
#[derive(Debug, Clone, Copy)]
pub struct TokenBucket {
    capacity: f64,
    refill_per_sec: f64,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    pub fn new(capacity: f64, refill_per_sec: f64, now: Instant) -> Self {
        Self {
            capacity,
            refill_per_sec,
            tokens: capacity,
            last_refill: now,
        }
    }

    /// Refills based on elapsed time, then attempts to take one token.
    /// Returns true if the frame is admitted.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.last_refill = now;
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// One connected client's server-side record. May be bound to at most one
/// Player; the binding is a lookup handle, not ownership.
pub struct Session {
    pub id: SessionId,
    pub room_id: Option<RoomId>,
    pub player_id: Option<PlayerId>,
    pub last_ping_sent_at: Option<Instant>,
    pub last_ping_id: Option<i64>,
    pub last_pong_at: Option<Instant>,
    pub rtt_ms: Option<i64>,
    pub last_message_at: Instant,
    pub bucket: TokenBucket,
    pub outbound: mpsc::Sender<Outbound>,
}

impl Session {
    pub fn new(
        id: SessionId,
        outbound: mpsc::Sender<Outbound>,
        bucket_capacity: f64,
        bucket_refill_per_sec: f64,
        now: Instant,
    ) -> Self {
        Self {
            id,
            room_id: None,
            player_id: None,
            last_ping_sent_at: None,
            last_ping_id: None,
            last_pong_at: None,
            rtt_ms: None,
            last_message_at: now,
            bucket: TokenBucket::new(bucket_capacity, bucket_refill_per_sec, now),
            outbound,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.room_id.is_some() && self.player_id.is_some()
    }
}
