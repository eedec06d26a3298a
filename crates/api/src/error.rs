use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use posecam_core::error::{DetectionError, StorageError};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Every variant renders as `{"error": "<message>"}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Image could not be decoded, annotated or had no landmarks.
    #[error(transparent)]
    Detection(#[from] DetectionError),

    /// Upload persistence failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A bad request with a human-readable message.
    #[error("{0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Detection(err) => {
                tracing::info!(error = %err, "Detection request failed");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::Storage(StorageError::InvalidFilename(name)) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid filename: {name:?}"),
            ),
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}
