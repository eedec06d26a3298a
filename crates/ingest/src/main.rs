//! `posecam-ingest` -- WebSocket frame ingest daemon.
//!
//! Accepts unauthenticated WebSocket connections and stores every
//! `{"frame": "<base64 image>"}` message as `FRAMES_DIR/frame_<n>.jpg`.
//! Configuration is read from the environment, see [`IngestConfig`].

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use posecam_core::frames::FrameStore;
use posecam_ingest::app::build_router;
use posecam_ingest::config::IngestConfig;
use posecam_ingest::state::IngestState;
use posecam_ingest::ws::{self, WsManager};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "posecam_ingest=debug,posecam_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = IngestConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let frames = FrameStore::open(&config.frames_dir).unwrap_or_else(|e| {
        tracing::error!(dir = %config.frames_dir.display(), error = %e, "Failed to open frame directory");
        std::process::exit(1);
    });
    tracing::info!(
        dir = %frames.dir().display(),
        next_index = frames.next_index(),
        "Frame store ready",
    );

    let addr = match config.host.parse() {
        Ok(ip) => SocketAddr::new(ip, config.port),
        Err(e) => {
            tracing::error!(host = %config.host, error = %e, "Invalid INGEST_HOST address");
            std::process::exit(1);
        }
    };

    let ws_manager = Arc::new(WsManager::new());
    let heartbeat_handle = ws::start_heartbeat(
        Arc::clone(&ws_manager),
        config.ping_interval(),
        config.idle_timeout(),
    );
    tracing::info!(
        ping_interval_secs = config.ping_interval_secs,
        ping_timeout_secs = config.ping_timeout_secs,
        max_message_bytes = config.max_message_bytes,
        "Keepalive started",
    );

    let state = IngestState {
        config: Arc::new(config),
        frames: Arc::new(frames),
        ws_manager: Arc::clone(&ws_manager),
    };
    let app = build_router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!("WebSocket server started on ws://{addr}");

    let shutdown_manager = Arc::clone(&ws_manager);
    let shutdown = async move {
        shutdown_signal().await;
        // Upgraded sessions are not tracked by the HTTP server; close them here.
        shutdown_manager.shutdown_all().await;
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
    {
        tracing::error!(error = %e, "Server error");
    }

    heartbeat_handle.abort();
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
