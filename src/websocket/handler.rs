use crate::server::GameServer;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::Response;
use std::sync::Arc;

use super::connection::handle_socket;

/// WebSocket upgrade entry point for the game protocol.
pub async fn websocket_handler(ws: WebSocketUpgrade, State(server): State<Arc<GameServer>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, server))
}
