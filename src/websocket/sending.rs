//! Per-session outbound delivery. Every frame bound for a session passes
//! through its `mpsc::Sender<Outbound>` (see `model::session::Session`); the
//! connection task owns the socket and is the only place that ever calls
//! `SinkExt::send` on it.

use crate::protocol::messages::ServerMessage;
use axum::extract::ws::Message;
use tracing::warn;

/// What the connection task should do with one queued item.
#[derive(Debug)]
pub enum Outbound {
    Frame(ServerMessage),
    Close { code: u16, reason: &'static str },
}

impl Outbound {
    /// Converts a frame into a websocket `Message::Text`. Returns `None` for
    /// a `ServerMessage` that fails to serialize, which should never happen
    /// for our own types but is handled rather than unwrapped.
    pub fn into_ws_message(self) -> Option<Message> {
        match self {
            Self::Frame(msg) => match serde_json::to_string(&msg) {
                Ok(text) => Some(Message::Text(text.into())),
                Err(err) => {
                    warn!(error = %err, "failed to serialize outbound frame");
                    None
                }
            },
            Self::Close { code, reason } => Some(Message::Close(Some(
                axum::extract::ws::CloseFrame {
                    code,
                    reason: reason.into(),
                },
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_serializes_to_text_message() {
        let outbound = Outbound::Frame(ServerMessage::Latency { rtt_ms: 42 });
        let msg = outbound.into_ws_message().unwrap();
        match msg {
            Message::Text(text) => assert!(text.contains("\"rttMs\":42")),
            other => panic!("expected Text, got {other:?}"),
        }
    }

    #[test]
    fn close_carries_code_and_reason() {
        let outbound = Outbound::Close {
            code: 4002,
            reason: "inactive",
        };
        let msg = outbound.into_ws_message().unwrap();
        match msg {
            Message::Close(Some(frame)) => {
                assert_eq!(frame.code, 4002);
                assert_eq!(frame.reason, "inactive");
            }
            other => panic!("expected Close, got {other:?}"),
        }
    }
}
