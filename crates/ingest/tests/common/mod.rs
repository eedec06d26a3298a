#![allow(dead_code)]

use std::io::Cursor;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use image::{Rgb, RgbImage};
use tempfile::TempDir;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use posecam_core::frames::FrameStore;
use posecam_ingest::app::build_router;
use posecam_ingest::config::IngestConfig;
use posecam_ingest::state::IngestState;
use posecam_ingest::ws::{start_heartbeat, WsManager};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A running ingest server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: IngestState,
    pub frames_dir: TempDir,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("ws://{}/", self.addr)
    }

    pub async fn connect(&self) -> Client {
        let (client, _response) = connect_async(self.url()).await.expect("WebSocket connect");
        client
    }

    pub fn frame_count(&self) -> usize {
        count_files(self.frames_dir.path())
    }

    /// Poll until exactly `expected` frames exist, or panic after 5 seconds.
    pub async fn wait_for_frames(&self, expected: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while self.frame_count() != expected {
            assert!(
                tokio::time::Instant::now() < deadline,
                "expected {expected} frames, found {}",
                self.frame_count()
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    /// Poll until the server tracks `expected` sessions.
    pub async fn wait_for_connections(&self, expected: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let count = self.state.ws_manager.connection_count().await;
            if count == expected {
                return;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "expected {expected} connections, found {count}"
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

pub fn test_config(frames_dir: &Path) -> IngestConfig {
    IngestConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        frames_dir: frames_dir.to_path_buf(),
        ping_interval_secs: 20,
        ping_timeout_secs: 20,
        max_message_bytes: 1024 * 1024,
    }
}

/// Start a server with the default test configuration and no heartbeat.
pub async fn spawn_server() -> TestServer {
    spawn_server_with(|_| {}).await
}

pub async fn spawn_server_with(customize: impl FnOnce(&mut IngestConfig)) -> TestServer {
    let frames_dir = tempfile::tempdir().unwrap();
    let mut config = test_config(frames_dir.path());
    customize(&mut config);

    let state = IngestState {
        frames: Arc::new(FrameStore::open(&config.frames_dir).unwrap()),
        config: Arc::new(config),
        ws_manager: Arc::new(WsManager::new()),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        addr,
        state,
        frames_dir,
    }
}

/// Start the keepalive task against the server's session registry.
pub fn start_test_heartbeat(
    server: &TestServer,
    interval: Duration,
    idle_timeout: Duration,
) -> tokio::task::JoinHandle<()> {
    start_heartbeat(Arc::clone(&server.state.ws_manager), interval, idle_timeout)
}

pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

/// `{"frame": "<base64 JPEG>"}` for a small solid image.
pub fn frame_message(width: u32, height: u32) -> String {
    let img = RgbImage::from_pixel(width, height, Rgb([40, 160, 90]));
    let mut jpeg = Cursor::new(Vec::new());
    img.write_to(&mut jpeg, image::ImageFormat::Jpeg).unwrap();
    let payload = base64::engine::general_purpose::STANDARD.encode(jpeg.get_ref());
    serde_json::json!({ "frame": payload, "timestamp": 1_700_000_000_000u64 }).to_string()
}
