use std::path::PathBuf;

use posecam_core::config::{env_or, parse_env};
pub use posecam_core::config::ConfigError;

/// Detection API configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Where original uploads are written (default: `uploads`).
    pub upload_dir: PathBuf,
    /// Where annotated copies are written (default: `processed`).
    pub processed_dir: PathBuf,
    /// HTTP request timeout in seconds (default: `120`).
    pub request_timeout_secs: u64,
    /// Maximum accepted request body in bytes (default: 16 MiB).
    pub max_upload_bytes: usize,
    /// Base URL of the landmark inference service.
    pub landmark_service_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `HOST`                 | `0.0.0.0`                |
    /// | `PORT`                 | `5000`                   |
    /// | `UPLOAD_DIR`           | `uploads`                |
    /// | `PROCESSED_DIR`        | `processed`              |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                    |
    /// | `MAX_UPLOAD_BYTES`     | `16777216`               |
    /// | `LANDMARK_SERVICE_URL` | `http://127.0.0.1:8500`  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or("HOST", "0.0.0.0"),
            port: parse_env("PORT", "5000", "u16")?,
            upload_dir: env_or("UPLOAD_DIR", "uploads").into(),
            processed_dir: env_or("PROCESSED_DIR", "processed").into(),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", "120", "u64")?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", "16777216", "usize")?,
            landmark_service_url: env_or("LANDMARK_SERVICE_URL", "http://127.0.0.1:8500"),
        })
    }
}
