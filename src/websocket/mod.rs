//! WebSocket and HTTP surface: the `/ws` upgrade, a per-session connection
//! task, outbound frame serialization, and a small set of plaintext/JSON
//! status routes.

mod connection;
mod handler;
mod routes;
pub mod sending;

pub use handler::websocket_handler;
pub use routes::{create_router, run_server};
