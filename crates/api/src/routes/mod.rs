pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{greeting, upload};
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// GET  /hello     -> greeting::hello
/// POST /echo      -> greeting::echo
/// POST /upload    -> upload::upload       (face mesh)
/// POST /P_upload  -> upload::pose_upload  (body pose)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/hello", get(greeting::hello))
        .route("/echo", post(greeting::echo))
        .route("/upload", post(upload::upload))
        .route("/P_upload", post(upload::pose_upload))
}
