use crate::model::session::SessionId;
use glam::DVec2;
use std::collections::VecDeque;
use uuid::Uuid;

pub type PlayerId = Uuid;

/// A player's body polyline, tail first, head last.
pub type Body = VecDeque<DVec2>;

pub struct Player {
    pub id: PlayerId,
    pub session_id: SessionId,
    pub name: String,
    pub score: f64,
    pub heading: f64,
    pub target_heading: f64,
    pub boosting: bool,
    pub body: Body,
    /// Monotonic insertion sequence within the room; lower means "inserted
    /// earlier", used for the stable head-to-head tie-break.
    pub inserted_seq: u64,
}

impl Player {
    pub fn new(
        id: PlayerId,
        session_id: SessionId,
        name: String,
        spawn: DVec2,
        heading: f64,
        inserted_seq: u64,
    ) -> Self {
        let mut body = VecDeque::with_capacity(64);
        body.push_back(spawn);
        Self {
            id,
            session_id,
            name,
            score: 0.0,
            heading,
            target_heading: heading,
            boosting: false,
            body,
            inserted_seq,
        }
    }

    pub fn head(&self) -> DVec2 {
        *self.body.back().expect("body always has at least one point")
    }

    /// Sum of segment lengths across the whole polyline.
    pub fn arc_length(&self) -> f64 {
        self.body
            .iter()
            .zip(self.body.iter().skip(1))
            .map(|(a, b)| a.distance(*b))
            .sum()
    }
}
