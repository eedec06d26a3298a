//! Router assembly shared by the binary and the integration tests.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::state::IngestState;
use crate::ws;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Live WebSocket sessions.
    pub connections: usize,
}

/// GET /health
async fn health_check(State(state): State<IngestState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        connections: state.ws_manager.connection_count().await,
    })
}

/// Build the ingest router.
///
/// ```text
/// GET /health   health + live session count
/// GET /         WebSocket upgrade
/// GET /{*path}  WebSocket upgrade (any path is accepted)
/// ```
pub fn build_router(state: IngestState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(ws::ws_handler))
        .route("/{*path}", get(ws::ws_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
