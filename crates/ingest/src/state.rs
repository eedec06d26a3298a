use std::sync::Arc;

use posecam_core::frames::FrameStore;

use crate::config::IngestConfig;
use crate::ws::WsManager;

/// Shared state for the ingest router.
#[derive(Clone)]
pub struct IngestState {
    pub config: Arc<IngestConfig>,
    /// Shared by every session; allocates frame names atomically.
    pub frames: Arc<FrameStore>,
    pub ws_manager: Arc<WsManager>,
}
