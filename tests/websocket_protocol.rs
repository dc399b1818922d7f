//! End-to-end coverage of the boundary scenarios a real client would hit:
//! joining over a real socket, sending input, getting pinged, and being
//! kicked/banned, all against a server bound to an ephemeral port.

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use worm_arena_server::config::Config;
use worm_arena_server::server::GameServer;
use worm_arena_server::websocket::create_router;

async fn spawn_test_server() -> (SocketAddr, std::sync::Arc<GameServer>) {
    let server = GameServer::new(Config::default());
    server.spawn_heartbeat();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = create_router().with_state(server.clone());
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .unwrap();
    });

    (addr, server)
}

/// Reads frames until one with tag `t == expected_tag` shows up, skipping
/// interleaved `ping` heartbeat frames the way a real client would.
async fn next_json_of_type(
    stream: &mut (impl StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin),
    expected_tag: &str,
) -> serde_json::Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("transport error");
        let Message::Text(text) = msg else { continue };
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        if value["t"] == expected_tag {
            return value;
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn hello_yields_welcome_then_joined() {
    let (addr, _server) = spawn_test_server().await;
    let url = format!("ws://{addr}/ws");
    let (ws, _) = connect_async(&url).await.unwrap();
    let (mut write, mut read) = ws.split();

    let _welcome = next_json_of_type(&mut read, "welcome").await;

    write
        .send(Message::Text(json!({"t": "hello", "name": "Pathfinder"}).to_string().into()))
        .await
        .unwrap();

    let joined = next_json_of_type(&mut read, "joined").await;
    assert!(joined["playerId"].is_string());
}

#[tokio::test(flavor = "multi_thread")]
async fn blank_name_is_rejected_with_error_frame() {
    let (addr, _server) = spawn_test_server().await;
    let url = format!("ws://{addr}/ws");
    let (ws, _) = connect_async(&url).await.unwrap();
    let (mut write, mut read) = ws.split();

    let _welcome = next_json_of_type(&mut read, "welcome").await;
    write
        .send(Message::Text(json!({"t": "hello", "name": "   "}).to_string().into()))
        .await
        .unwrap();

    let error = next_json_of_type(&mut read, "error").await;
    assert_eq!(error["error"], "invalid_name");
}

#[tokio::test(flavor = "multi_thread")]
async fn joined_player_receives_state_broadcasts() {
    let (addr, _server) = spawn_test_server().await;
    let url = format!("ws://{addr}/ws");
    let (ws, _) = connect_async(&url).await.unwrap();
    let (mut write, mut read) = ws.split();

    let _welcome = next_json_of_type(&mut read, "welcome").await;
    write
        .send(Message::Text(json!({"t": "hello", "name": "Rosie"}).to_string().into()))
        .await
        .unwrap();
    let _joined = next_json_of_type(&mut read, "joined").await;

    let state = next_json_of_type(&mut read, "state").await;
    assert!(state["players"].is_array());
    assert!(!state["players"].as_array().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn admin_kick_closes_the_connection() {
    let (addr, server) = spawn_test_server().await;
    let url = format!("ws://{addr}/ws");
    let (ws, _) = connect_async(&url).await.unwrap();
    let (mut write, mut read) = ws.split();

    let _welcome = next_json_of_type(&mut read, "welcome").await;
    write
        .send(Message::Text(json!({"t": "hello", "name": "Target"}).to_string().into()))
        .await
        .unwrap();
    let joined = next_json_of_type(&mut read, "joined").await;
    let room_id: uuid::Uuid = joined["roomId"].as_str().unwrap().parse().unwrap();
    let player_id: uuid::Uuid = joined["playerId"].as_str().unwrap().parse().unwrap();

    assert!(server.kick(room_id, player_id));

    let closed = loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), read.next())
            .await
            .expect("timed out waiting for close")
            .expect("stream ended")
            .expect("transport error");
        if let Message::Text(text) = &msg {
            let value: serde_json::Value = serde_json::from_str(text).unwrap();
            if value["t"] == "ping" {
                continue;
            }
        }
        break msg;
    };
    match closed {
        Message::Close(Some(frame)) => assert_eq!(frame.code, 4000),
        other => panic!("expected a close frame, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn ping_gets_a_pong_back() {
    let (addr, _server) = spawn_test_server().await;
    let url = format!("ws://{addr}/ws");
    let (ws, _) = connect_async(&url).await.unwrap();
    let (mut write, mut read) = ws.split();

    let _welcome = next_json_of_type(&mut read, "welcome").await;
    write
        .send(Message::Text(json!({"t": "ping", "pingId": 7}).to_string().into()))
        .await
        .unwrap();

    let pong = next_json_of_type(&mut read, "pong").await;
    assert_eq!(pong["pingId"], 7);
}

#[tokio::test(flavor = "multi_thread")]
async fn ban_kicks_a_currently_connected_matching_player() {
    let (addr, server) = spawn_test_server().await;
    let url = format!("ws://{addr}/ws");
    let (ws, _) = connect_async(&url).await.unwrap();
    let (mut write, mut read) = ws.split();

    let _welcome = next_json_of_type(&mut read, "welcome").await;
    write
        .send(Message::Text(json!({"t": "hello", "name": "Troll"}).to_string().into()))
        .await
        .unwrap();
    let _joined = next_json_of_type(&mut read, "joined").await;

    server.ban("troll");

    let closed = loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), read.next())
            .await
            .expect("timed out waiting for close")
            .expect("stream ended")
            .expect("transport error");
        if let Message::Text(text) = &msg {
            let value: serde_json::Value = serde_json::from_str(text).unwrap();
            if value["t"] == "ping" || value["t"] == "state" {
                continue;
            }
        }
        break msg;
    };
    match closed {
        Message::Close(Some(frame)) => assert_eq!(frame.code, 4001),
        other => panic!("expected a close frame, got {other:?}"),
    }
}
