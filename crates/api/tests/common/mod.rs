#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use image::{Rgb, RgbImage};
use tempfile::TempDir;
use tower::ServiceExt;

use posecam_api::app::build_router;
use posecam_api::config::ServerConfig;
use posecam_api::state::AppState;
use posecam_core::detector::LandmarkDetector;
use posecam_core::error::DetectorError;
use posecam_core::landmarks::{
    FaceMesh, FaceMeshOptions, NormalizedLandmark, PoseSkeleton, POSE_LANDMARK_COUNT,
};
use posecam_core::storage::UploadStorage;

pub const BOUNDARY: &str = "posecam-test-boundary";

/// Detector returning canned landmarks regardless of the image.
pub struct FakeDetector {
    pub faces: Vec<FaceMesh>,
    pub pose: Option<PoseSkeleton>,
}

impl FakeDetector {
    /// One face with a single centred landmark and a full visible skeleton.
    pub fn finds_everything() -> Self {
        Self {
            faces: vec![FaceMesh {
                landmarks: vec![NormalizedLandmark::new(0.5, 0.5)],
            }],
            pose: Some(PoseSkeleton {
                landmarks: vec![NormalizedLandmark::new(0.5, 0.5); POSE_LANDMARK_COUNT],
            }),
        }
    }

    pub fn finds_nothing() -> Self {
        Self {
            faces: vec![],
            pose: None,
        }
    }
}

#[async_trait]
impl LandmarkDetector for FakeDetector {
    async fn face_mesh(
        &self,
        _image: &RgbImage,
        _options: &FaceMeshOptions,
    ) -> Result<Vec<FaceMesh>, DetectorError> {
        Ok(self.faces.clone())
    }

    async fn pose(&self, _image: &RgbImage) -> Result<Option<PoseSkeleton>, DetectorError> {
        Ok(self.pose.clone())
    }
}

/// A router plus the temporary directories it writes to.
pub struct TestApp {
    pub router: Router,
    pub root: TempDir,
}

impl TestApp {
    pub fn uploads_dir(&self) -> PathBuf {
        self.root.path().join("uploads")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.path().join("processed")
    }
}

pub fn test_config(root: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        upload_dir: root.path().join("uploads"),
        processed_dir: root.path().join("processed"),
        request_timeout_secs: 30,
        max_upload_bytes: 4 * 1024 * 1024,
        landmark_service_url: "http://127.0.0.1:1".to_string(),
    }
}

/// Build the full application router (same middleware as the binary).
pub fn build_test_app(detector: FakeDetector) -> TestApp {
    let root = tempfile::tempdir().unwrap();
    let config = test_config(&root);
    let storage = UploadStorage::open(&config.upload_dir, &config.processed_dir).unwrap();

    let state = AppState {
        config: Arc::new(config),
        detector: Arc::new(detector),
        storage: Arc::new(storage),
    };

    TestApp {
        router: build_router(state),
        root,
    }
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: &TestApp, uri: &str, body: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST a multipart body with a single part.
///
/// `filename: None` produces a plain form field without a filename.
pub async fn post_file(
    app: &TestApp,
    uri: &str,
    field: &str,
    filename: Option<&str>,
    data: &[u8],
) -> Response<Body> {
    let request = Request::post(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field, filename, data)))
        .unwrap();
    send(app, request).await
}

pub fn multipart_body(field: &str, filename: Option<&str>, data: &[u8]) -> Vec<u8> {
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
        None => format!("form-data; name=\"{field}\""),
    };
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {disposition}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Encode a solid-colour PNG of the given size.
pub fn png_image(width: u32, height: u32, shade: u8) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([shade, shade, shade]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}
