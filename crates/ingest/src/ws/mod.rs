//! WebSocket infrastructure for frame ingest.
//!
//! Provides session tracking, keepalive/idle eviction, the per-message
//! ingest step and the HTTP upgrade handler used by Axum routes.

mod handler;
mod heartbeat;
pub mod ingest;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
