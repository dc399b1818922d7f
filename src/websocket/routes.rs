//! HTTP surface: the `/ws` upgrade plus a health check and a JSON metrics
//! snapshot. Nothing admin-facing lives here.

use crate::config::Config;
use crate::server::GameServer;
use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handler::websocket_handler;

pub fn create_router() -> axum::Router<Arc<GameServer>> {
    axum::Router::new()
        .route("/ws", get(websocket_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics_handler(State(server): State<Arc<GameServer>>) -> Json<crate::metrics::ServerMetricsSnapshot> {
    Json(server.metrics.snapshot())
}

/// Binds and serves the router. `main` is the only other caller.
pub async fn run_server(addr: SocketAddr, config: Config) -> anyhow::Result<()> {
    let server = GameServer::new(config);
    server.spawn_heartbeat();

    let app = create_router().with_state(server);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "worm arena server listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
