//! The vision capability: landmark detection delegated to an external
//! library or service.
//!
//! The services hold one `Arc<dyn LandmarkDetector>` built at startup and
//! share it with every request. Tests substitute their own implementation.

mod remote;

use async_trait::async_trait;
use image::RgbImage;

use crate::error::DetectorError;
use crate::landmarks::{FaceMesh, FaceMeshOptions, PoseSkeleton};

pub use remote::RemoteDetector;

/// Face-mesh and body-pose landmark detection.
#[async_trait]
pub trait LandmarkDetector: Send + Sync {
    /// Detect face meshes. An empty vector means no face was found.
    async fn face_mesh(
        &self,
        image: &RgbImage,
        options: &FaceMeshOptions,
    ) -> Result<Vec<FaceMesh>, DetectorError>;

    /// Detect a single body skeleton, `None` when nobody is found.
    async fn pose(&self, image: &RgbImage) -> Result<Option<PoseSkeleton>, DetectorError>;
}
