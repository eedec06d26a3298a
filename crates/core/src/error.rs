/// Failure reported by a [`LandmarkDetector`](crate::detector::LandmarkDetector)
/// backend.
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    /// The backend could not be reached or returned an unusable response.
    #[error("Landmark backend error: {0}")]
    Backend(String),

    /// The image could not be prepared for the backend.
    #[error("Could not prepare image for detection: {0}")]
    Input(String),
}

/// Errors produced by the detection pipeline.
///
/// Every variant renders as a human-readable sentence; the HTTP layer returns
/// that text verbatim.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("Could not read the image: {0}")]
    Decode(String),

    #[error("No faces detected in the image.")]
    NoFaceDetected,

    #[error("No pose landmarks detected in the image.")]
    NoPoseDetected,

    #[error(transparent)]
    Detector(#[from] DetectorError),

    #[error("Could not encode the processed image: {0}")]
    Encode(String),
}

/// Errors from persisting uploads and processed copies.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encode error: {0}")]
    Encode(#[from] image::ImageError),
}
