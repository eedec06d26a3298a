use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single ingest session.
pub struct WsConnection {
    /// Channel sender for outbound control frames (Ping, Close).
    pub sender: WsSender,
    /// When this connection was established.
    pub connected_at: DateTime<Utc>,
    /// Last time anything arrived from the client.
    pub last_seen: Instant,
}

/// Tracks all live ingest sessions.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    /// Create a new, empty connection manager.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink.
    pub async fn add(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            sender: tx,
            connected_at: Utc::now(),
            last_seen: Instant::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection by its ID.
    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Record inbound activity on a connection.
    pub async fn touch(&self, conn_id: &str) {
        if let Some(conn) = self.connections.write().await.get_mut(conn_id) {
            conn.last_seen = Instant::now();
        }
    }

    /// Return the current number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// When a connection was established, if it is still registered.
    pub async fn connected_at(&self, conn_id: &str) -> Option<DateTime<Utc>> {
        self.connections
            .read()
            .await
            .get(conn_id)
            .map(|conn| conn.connected_at)
    }

    /// Send a Ping frame to every connected client.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }

    /// Close and drop every connection silent for longer than `max_idle`.
    ///
    /// Returns the evicted connection IDs.
    pub async fn evict_stale(&self, max_idle: Duration) -> Vec<String> {
        let mut conns = self.connections.write().await;
        let stale: Vec<String> = conns
            .iter()
            .filter(|(_, conn)| conn.last_seen.elapsed() > max_idle)
            .map(|(id, _)| id.clone())
            .collect();

        for id in &stale {
            if let Some(conn) = conns.remove(id) {
                let _ = conn.sender.send(Message::Close(None));
            }
        }
        stale
    }

    /// Send a Close frame to every connection, then clear the map.
    ///
    /// Used during graceful shutdown.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
