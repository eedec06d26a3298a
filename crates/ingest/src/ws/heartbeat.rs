use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::WsManager;

/// Spawn the keepalive task.
///
/// Every `interval` it disconnects sessions that have been silent for longer
/// than `idle_timeout`, then pings the rest. The returned `JoinHandle` can be
/// used to abort the task at shutdown.
pub fn start_heartbeat(
    ws_manager: Arc<WsManager>,
    interval: Duration,
    idle_timeout: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;

            let evicted = ws_manager.evict_stale(idle_timeout).await;
            for conn_id in &evicted {
                tracing::info!(conn_id = %conn_id, "Keepalive timed out, closing session");
            }

            let count = ws_manager.connection_count().await;
            tracing::debug!(count, "WebSocket heartbeat ping");
            ws_manager.ping_all().await;
        }
    })
}
