use std::path::PathBuf;
use std::time::Duration;

use posecam_core::config::{env_or, parse_env};
pub use posecam_core::config::ConfigError;

/// Frame Ingest configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Directory receiving `frame_<n>.jpg` files (default: `received_frames`).
    pub frames_dir: PathBuf,
    /// Seconds between keepalive pings (default: `20`).
    pub ping_interval_secs: u64,
    /// Extra seconds a client may stay silent after a ping before it is
    /// disconnected (default: `20`).
    pub ping_timeout_secs: u64,
    /// Largest accepted WebSocket message in bytes (default: 5 MiB).
    pub max_message_bytes: usize,
}

impl IngestConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default           |
    /// |----------------------|-------------------|
    /// | `INGEST_HOST`        | `0.0.0.0`         |
    /// | `INGEST_PORT`        | `8000`            |
    /// | `FRAMES_DIR`         | `received_frames` |
    /// | `PING_INTERVAL_SECS` | `20`              |
    /// | `PING_TIMEOUT_SECS`  | `20`              |
    /// | `MAX_MESSAGE_BYTES`  | `5242880`         |
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or("INGEST_HOST", "0.0.0.0"),
            port: parse_env("INGEST_PORT", "8000", "u16")?,
            frames_dir: env_or("FRAMES_DIR", "received_frames").into(),
            ping_interval_secs: parse_env("PING_INTERVAL_SECS", "20", "u64")?,
            ping_timeout_secs: parse_env("PING_TIMEOUT_SECS", "20", "u64")?,
            max_message_bytes: parse_env("MAX_MESSAGE_BYTES", "5242880", "usize")?,
        })
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs.max(1))
    }

    /// Silence after which a session is considered dead.
    pub fn idle_timeout(&self) -> Duration {
        self.ping_interval() + Duration::from_secs(self.ping_timeout_secs)
    }
}
