//! HTTP client for an external landmark inference service.
//!
//! Wire protocol:
//!
//! ```text
//! POST {base}/face_mesh?static_image_mode=..&max_num_faces=..&refine_landmarks=..&min_detection_confidence=..
//!      body: image/jpeg            -> {"faces": [[{"x","y","z"}, ...], ...]}
//! POST {base}/pose
//!      body: image/jpeg            -> {"landmarks": [{"x","y","z","visibility"}, ...] | null}
//! ```

use async_trait::async_trait;
use image::RgbImage;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::codec::{encode_jpeg, RESPONSE_JPEG_QUALITY};
use crate::detector::LandmarkDetector;
use crate::error::DetectorError;
use crate::landmarks::{FaceMesh, FaceMeshOptions, NormalizedLandmark, PoseSkeleton};

#[derive(Debug, Deserialize)]
struct FaceMeshResponse {
    #[serde(default)]
    faces: Vec<Vec<NormalizedLandmark>>,
}

#[derive(Debug, Deserialize)]
struct PoseResponse {
    landmarks: Option<Vec<NormalizedLandmark>>,
}

/// [`LandmarkDetector`] backed by a remote inference service.
pub struct RemoteDetector {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteDetector {
    /// `base_url` is the service root, e.g. `http://127.0.0.1:8500`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_image<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        image: &RgbImage,
    ) -> Result<T, DetectorError> {
        let body = encode_jpeg(image, RESPONSE_JPEG_QUALITY)
            .map_err(|e| DetectorError::Input(e.to_string()))?;
        let url = format!("{}/{path}", self.base_url);

        let response = self
            .client
            .post(&url)
            .query(query)
            .header(CONTENT_TYPE, "image/jpeg")
            .body(body)
            .send()
            .await
            .map_err(|e| DetectorError::Backend(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DetectorError::Backend(format!(
                "{url} returned {status}: {text}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DetectorError::Backend(format!("Invalid response from {url}: {e}")))
    }
}

#[async_trait]
impl LandmarkDetector for RemoteDetector {
    async fn face_mesh(
        &self,
        image: &RgbImage,
        options: &FaceMeshOptions,
    ) -> Result<Vec<FaceMesh>, DetectorError> {
        let query = [
            ("static_image_mode", options.static_image_mode.to_string()),
            ("max_num_faces", options.max_num_faces.to_string()),
            ("refine_landmarks", options.refine_landmarks.to_string()),
            (
                "min_detection_confidence",
                options.min_detection_confidence.to_string(),
            ),
        ];
        let response: FaceMeshResponse = self.post_image("face_mesh", &query, image).await?;

        tracing::debug!(faces = response.faces.len(), "Face mesh response received");
        Ok(response
            .faces
            .into_iter()
            .map(|landmarks| FaceMesh { landmarks })
            .collect())
    }

    async fn pose(&self, image: &RgbImage) -> Result<Option<PoseSkeleton>, DetectorError> {
        let response: PoseResponse = self.post_image("pose", &[], image).await?;

        tracing::debug!(found = response.landmarks.is_some(), "Pose response received");
        Ok(response
            .landmarks
            .filter(|l| !l.is_empty())
            .map(|landmarks| PoseSkeleton { landmarks }))
    }
}
