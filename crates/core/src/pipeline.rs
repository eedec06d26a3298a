//! Detection API operations: decode, detect, annotate, re-encode.
//!
//! CPU-bound steps run on the blocking pool; the detector call itself is
//! awaited without a timeout.

use image::RgbImage;

use crate::annotate::{draw_face_mesh, draw_pose, POSE_CONNECTION_SPEC, POSE_LANDMARK_SPEC};
use crate::codec::{decode_image, encode_jpeg, to_base64, RESPONSE_JPEG_QUALITY};
use crate::detector::LandmarkDetector;
use crate::error::DetectionError;
use crate::landmarks::FaceMeshOptions;

/// An input image with landmark markers drawn on it.
#[derive(Debug, Clone)]
pub struct AnnotatedImage {
    /// The annotated pixels, same dimensions as the input.
    pub image: RgbImage,
    /// `image` encoded as JPEG.
    pub jpeg: Vec<u8>,
}

impl AnnotatedImage {
    pub fn to_base64(&self) -> String {
        to_base64(&self.jpeg)
    }
}

/// Run face-mesh detection on `image_bytes` and mark every landmark.
pub async fn detect_face_landmarks(
    detector: &dyn LandmarkDetector,
    image_bytes: &[u8],
) -> Result<AnnotatedImage, DetectionError> {
    let image = decode_blocking(image_bytes.to_vec()).await?;

    let faces = detector
        .face_mesh(&image, &FaceMeshOptions::default())
        .await?;
    if faces.is_empty() {
        return Err(DetectionError::NoFaceDetected);
    }
    tracing::debug!(faces = faces.len(), "Face landmarks detected");

    run_blocking(move || {
        let mut image = image;
        for face in &faces {
            draw_face_mesh(&mut image, face);
        }
        finish(image)
    })
    .await
}

/// Run pose detection on `image_bytes` and draw the skeleton.
pub async fn detect_pose_landmarks(
    detector: &dyn LandmarkDetector,
    image_bytes: &[u8],
) -> Result<AnnotatedImage, DetectionError> {
    let image = decode_blocking(image_bytes.to_vec()).await?;

    let skeleton = detector
        .pose(&image)
        .await?
        .ok_or(DetectionError::NoPoseDetected)?;
    tracing::debug!(landmarks = skeleton.landmarks.len(), "Pose landmarks detected");

    run_blocking(move || {
        let mut image = image;
        draw_pose(
            &mut image,
            &skeleton,
            &POSE_LANDMARK_SPEC,
            &POSE_CONNECTION_SPEC,
        );
        finish(image)
    })
    .await
}

fn finish(image: RgbImage) -> Result<AnnotatedImage, DetectionError> {
    let jpeg = encode_jpeg(&image, RESPONSE_JPEG_QUALITY)
        .map_err(|e| DetectionError::Encode(e.to_string()))?;
    Ok(AnnotatedImage { image, jpeg })
}

async fn decode_blocking(bytes: Vec<u8>) -> Result<RgbImage, DetectionError> {
    run_blocking(move || decode_image(&bytes)).await
}

async fn run_blocking<T, F>(f: F) -> Result<T, DetectionError>
where
    F: FnOnce() -> Result<T, DetectionError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DetectionError::Encode(format!("Image worker failed: {e}")))?
}
