//! Disk persistence for uploaded originals and their processed copies.
//!
//! Files are keyed by the client-supplied filename with no collision
//! handling: a later upload with the same name overwrites the earlier one.

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::codec::{encode_jpeg, RESPONSE_JPEG_QUALITY};
use crate::error::StorageError;

/// Reduce a client-supplied filename to its final path component.
///
/// Returns `None` when nothing usable remains (empty, `.` or `..`).
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    match base {
        "" | "." | ".." => None,
        other => Some(other.to_string()),
    }
}

/// The `uploads/` and `processed/` directories.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    uploads_dir: PathBuf,
    processed_dir: PathBuf,
}

impl UploadStorage {
    /// Create both directories if absent.
    pub fn open(
        uploads_dir: impl Into<PathBuf>,
        processed_dir: impl Into<PathBuf>,
    ) -> Result<Self, StorageError> {
        let storage = Self {
            uploads_dir: uploads_dir.into(),
            processed_dir: processed_dir.into(),
        };
        std::fs::create_dir_all(&storage.uploads_dir)?;
        std::fs::create_dir_all(&storage.processed_dir)?;
        Ok(storage)
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }

    /// Write the original upload bytes unchanged.
    pub async fn save_upload(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        let path = resolve(&self.uploads_dir, filename)?;
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Upload stored");
        Ok(path)
    }

    /// Write the annotated image, encoded according to the filename
    /// extension (JPEG when the extension is unknown or missing).
    pub async fn save_processed(
        &self,
        filename: &str,
        image: RgbImage,
    ) -> Result<PathBuf, StorageError> {
        let path = resolve(&self.processed_dir, filename)?;
        let target = path.clone();

        tokio::task::spawn_blocking(move || write_image(&target, &image))
            .await
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))??;

        tracing::debug!(path = %path.display(), "Processed image stored");
        Ok(path)
    }
}

fn resolve(dir: &Path, filename: &str) -> Result<PathBuf, StorageError> {
    let name =
        sanitize_filename(filename).ok_or_else(|| StorageError::InvalidFilename(filename.into()))?;
    Ok(dir.join(name))
}

fn write_image(path: &Path, image: &RgbImage) -> Result<(), StorageError> {
    match ImageFormat::from_path(path) {
        Ok(format @ (ImageFormat::Png | ImageFormat::WebP)) => {
            image.save_with_format(path, format)?;
        }
        _ => {
            let jpeg = encode_jpeg(image, RESPONSE_JPEG_QUALITY)?;
            std::fs::write(path, jpeg)?;
        }
    }
    Ok(())
}
