use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use posecam_api::app::build_router;
use posecam_api::config::ServerConfig;
use posecam_api::state::AppState;
use posecam_core::detector::{LandmarkDetector, RemoteDetector};
use posecam_core::storage::UploadStorage;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "posecam_api=debug,posecam_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });
    tracing::info!(host = %config.host, port = config.port, "Loaded server configuration");

    // --- Storage ---
    let storage = UploadStorage::open(&config.upload_dir, &config.processed_dir).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to create upload directories");
        std::process::exit(1);
    });
    tracing::info!(
        uploads = %storage.uploads_dir().display(),
        processed = %storage.processed_dir().display(),
        "Upload storage ready",
    );

    // --- Landmark detector ---
    let detector: Arc<dyn LandmarkDetector> =
        Arc::new(RemoteDetector::new(config.landmark_service_url.clone()));
    tracing::info!(url = %config.landmark_service_url, "Landmark detector configured");

    let addr = match config.host.parse() {
        Ok(ip) => SocketAddr::new(ip, config.port),
        Err(e) => {
            tracing::error!(host = %config.host, error = %e, "Invalid HOST address");
            std::process::exit(1);
        }
    };

    // --- App state + router ---
    let state = AppState {
        config: Arc::new(config),
        detector,
        storage: Arc::new(storage),
    };
    let app = build_router(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting Detection API");
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }

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
