//! Image upload endpoints: face-mesh and body-pose annotation.
//!
//! Both endpoints store the original upload, run detection, store the
//! annotated copy and return it as base64 JPEG. A failed detection still
//! leaves the original in the uploads directory.

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use posecam_core::pipeline::{detect_face_landmarks, detect_pose_landmarks, AnnotatedImage};
use posecam_core::storage::sanitize_filename;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    /// Annotated image, JPEG encoded, then base64.
    pub processed_image: String,
}

#[derive(Debug, Clone, Copy)]
enum Analysis {
    FaceMesh,
    Pose,
}

/// POST /api/upload
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let processed_image = process_upload(&state, multipart, Analysis::FaceMesh).await?;
    Ok(Json(UploadResponse {
        message: "File processed successfully",
        processed_image,
    }))
}

/// POST /api/P_upload
pub async fn pose_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let processed_image = process_upload(&state, multipart, Analysis::Pose).await?;
    Ok(Json(UploadResponse {
        message: "Pose processed successfully",
        processed_image,
    }))
}

async fn process_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    analysis: Analysis,
) -> AppResult<String> {
    let multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "Request is not multipart");
        AppError::BadRequest("No file part".into())
    })?;
    let (filename, bytes) = read_file_field(multipart).await?;

    if filename.is_empty() {
        return Err(AppError::BadRequest("No selected file".into()));
    }
    let filename = sanitize_filename(&filename)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid filename: {filename:?}")))?;

    state.storage.save_upload(&filename, &bytes).await?;

    let detector = state.detector.as_ref();
    let annotated: AnnotatedImage = match analysis {
        Analysis::FaceMesh => detect_face_landmarks(detector, &bytes).await?,
        Analysis::Pose => detect_pose_landmarks(detector, &bytes).await?,
    };
    let encoded = annotated.to_base64();

    state
        .storage
        .save_processed(&filename, annotated.image)
        .await?;

    tracing::info!(
        filename = %filename,
        ?analysis,
        bytes = bytes.len(),
        "Upload processed",
    );

    Ok(encoded)
}

/// Find the `file` part. A part without a filename does not count as a file.
async fn read_file_field(mut multipart: Multipart) -> AppResult<(String, Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        return Ok((filename, data));
    }

    Err(AppError::BadRequest("No file part".into()))
}
