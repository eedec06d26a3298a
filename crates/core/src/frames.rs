//! Frame ingest core: message parsing and the on-disk frame store.
//!
//! Frames are named `frame_<n>.jpg`. The sequence is an atomic counter
//! seeded from the highest index already on disk, and files are created with
//! create-new semantics, so concurrent sessions never overwrite each other.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;

use crate::codec::{decode_image, encode_jpeg, from_base64, FRAME_JPEG_QUALITY};

const FRAME_PREFIX: &str = "frame_";
const FRAME_EXTENSION: &str = ".jpg";

/// Inbound ingest message. Fields other than `frame` (e.g. a client
/// timestamp) are ignored.
#[derive(Debug, Deserialize)]
struct FrameMessage {
    frame: Option<serde_json::Value>,
}

/// Why an inbound message carried no usable frame.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Message is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("No 'frame' key found in the message")]
    MissingFrame,

    #[error("'frame' must be a base64 string")]
    FrameNotString,
}

/// Failure while storing a decoded frame.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid image: {0}")]
    Image(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract the base64 `frame` payload from a raw JSON message.
pub fn parse_frame_message(raw: &str) -> Result<String, MessageError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| MessageError::InvalidJson(e.to_string()))?;

    if !value.is_object() {
        return Err(MessageError::MissingFrame);
    }
    let message: FrameMessage =
        serde_json::from_value(value).map_err(|e| MessageError::InvalidJson(e.to_string()))?;

    match message.frame {
        None => Err(MessageError::MissingFrame),
        Some(serde_json::Value::String(frame)) => Ok(frame),
        Some(_) => Err(MessageError::FrameNotString),
    }
}

/// A frame written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFrame {
    pub index: u64,
    pub path: PathBuf,
}

/// Sequentially numbered JPEG frames in a flat directory.
#[derive(Debug)]
pub struct FrameStore {
    dir: PathBuf,
    next_index: AtomicU64,
}

impl FrameStore {
    /// Create `dir` if absent and continue numbering after any frames
    /// already in it.
    pub fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let mut next = 0;
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let Some(index) = entry.file_name().to_str().and_then(frame_index) else {
                continue;
            };
            match index.checked_add(1) {
                Some(after) => next = next.max(after),
                None => tracing::warn!(index, "Ignoring frame with out-of-range index"),
            }
        }

        tracing::debug!(dir = %dir.display(), next_index = next, "Frame store opened");
        Ok(Self {
            dir,
            next_index: AtomicU64::new(next),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Index the next stored frame will receive (absent collisions).
    pub fn next_index(&self) -> u64 {
        self.next_index.load(Ordering::SeqCst)
    }

    /// Decode a base64 image and write it as the next JPEG frame.
    ///
    /// Blocking; callers on an async runtime should use `spawn_blocking`.
    pub fn save(&self, frame_base64: &str) -> Result<StoredFrame, FrameError> {
        let bytes = from_base64(frame_base64)?;
        let image = decode_image(&bytes).map_err(|e| FrameError::Image(e.to_string()))?;
        let jpeg =
            encode_jpeg(&image, FRAME_JPEG_QUALITY).map_err(|e| FrameError::Image(e.to_string()))?;

        loop {
            let index = self.next_index.fetch_add(1, Ordering::SeqCst);
            let path = self.dir.join(frame_filename(index));

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(&jpeg)?;
                    return Ok(StoredFrame { index, path });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(index, "Frame name taken, advancing sequence");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

pub fn frame_filename(index: u64) -> String {
    format!("{FRAME_PREFIX}{index}{FRAME_EXTENSION}")
}

fn frame_index(name: &str) -> Option<u64> {
    name.strip_prefix(FRAME_PREFIX)?
        .strip_suffix(FRAME_EXTENSION)?
        .parse()
        .ok()
}
