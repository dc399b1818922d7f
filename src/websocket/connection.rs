//! Per-session connection task: owns the socket, bridges it to
//! `SessionRegistry`/`InputPipeline`, and cleans up on disconnect. Nothing
//! outside this task ever touches the socket itself.

use crate::model::session::Session;
use crate::protocol::messages::ServerMessage;
use crate::server::commands::RoomCommand;
use crate::server::GameServer;
use crate::time::monotonic_millis;
use crate::websocket::sending::Outbound;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{info, info_span, warn, Instrument};

pub(super) async fn handle_socket(socket: WebSocket, server: Arc<GameServer>) {
    let session_id = uuid::Uuid::new_v4();
    let span = info_span!("session", session_id = %session_id);
    handle_socket_inner(socket, server, session_id).instrument(span).await;
}

async fn handle_socket_inner(socket: WebSocket, server: Arc<GameServer>, session_id: uuid::Uuid) {
    let (mut sink, mut stream) = socket.split();

    let rate_limit = &server.config.server.rate_limit;
    let (tx, mut rx) = mpsc::channel::<Outbound>(server.config.server.websocket.outbound_channel_capacity);
    let session = Session::new(
        session_id,
        tx,
        rate_limit.token_bucket_capacity,
        rate_limit.token_bucket_refill_per_sec,
        Instant::now(),
    );
    server.session_registry.insert(session);
    server.session_registry.send(
        session_id,
        Outbound::Frame(ServerMessage::Welcome {
            server_now: monotonic_millis(),
        }),
    );

    info!("connection established");

    let outbound_task = tokio::spawn(async move {
        while let Some(item) = rx.recv().await {
            let is_close = matches!(item, Outbound::Close { .. });
            let Some(message) = item.into_ws_message() else {
                continue;
            };
            if sink.send(message).await.is_err() {
                break;
            }
            if is_close {
                break;
            }
        }
    });

    let max_message_size = server.config.server.websocket.max_message_size;
    loop {
        let Some(frame) = stream.next().await else { break };
        let frame = match frame {
            Ok(frame) => frame,
            Err(err) => {
                warn!(error = %err, "websocket transport error");
                break;
            }
        };

        match frame {
            Message::Text(text) => {
                server.session_registry.touch_last_message(session_id, Instant::now());
                if text.len() > max_message_size {
                    continue;
                }
                match serde_json::from_str(&text) {
                    Ok(message) => server.input_pipeline.handle(session_id, message),
                    Err(_) => continue,
                }
            }
            Message::Binary(_) => {
                server.session_registry.touch_last_message(session_id, Instant::now());
            }
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    if let Some((room_id, player_id)) = server.session_registry.binding(session_id) {
        server.room_manager.send_command(room_id, RoomCommand::Leave { player_id });
    }
    server.session_registry.remove(session_id);
    outbound_task.abort();
    info!("connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn new_session_receives_a_welcome_frame() {
        let server = GameServer::new(Config::default());
        let (tx, mut rx) = mpsc::channel::<Outbound>(8);
        let session_id = uuid::Uuid::new_v4();
        let session = Session::new(session_id, tx, 45.0, 30.0, Instant::now());
        server.session_registry.insert(session);
        server.session_registry.send(
            session_id,
            Outbound::Frame(ServerMessage::Welcome { server_now: 0 }),
        );

        let outbound = rx.recv().await.unwrap();
        match outbound {
            Outbound::Frame(ServerMessage::Welcome { .. }) => {}
            other => panic!("expected Welcome frame, got {other:?}"),
        }
    }
}
