use std::sync::Arc;

use posecam_core::detector::LandmarkDetector;
use posecam_core::storage::UploadStorage;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// The single landmark detector, built once at startup.
    pub detector: Arc<dyn LandmarkDetector>,
    /// Upload and processed-copy directories.
    pub storage: Arc<UploadStorage>,
}
