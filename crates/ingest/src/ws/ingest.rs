//! One ingest step: turn a raw message into a stored frame or a logged
//! reason why not. Never fails the session.

use std::sync::Arc;

use posecam_core::frames::{parse_frame_message, FrameError, FrameStore, MessageError, StoredFrame};

/// Result of handling one inbound message.
#[derive(Debug)]
pub enum IngestOutcome {
    Stored(StoredFrame),
    /// Valid JSON without a `frame` key.
    MissingFrame,
    /// Not JSON, or `frame` is not a string.
    Malformed(MessageError),
    /// The frame payload could not be decoded or written.
    Failed(FrameError),
}

impl IngestOutcome {
    /// Log the outcome against its session.
    pub fn log(&self, conn_id: &str) {
        match self {
            IngestOutcome::Stored(frame) => tracing::debug!(
                conn_id = %conn_id,
                index = frame.index,
                path = %frame.path.display(),
                "Saved frame",
            ),
            IngestOutcome::MissingFrame => {
                tracing::warn!(conn_id = %conn_id, "No 'frame' key found in the message")
            }
            IngestOutcome::Malformed(e) => {
                tracing::warn!(conn_id = %conn_id, error = %e, "Malformed message")
            }
            IngestOutcome::Failed(e) => {
                tracing::error!(conn_id = %conn_id, error = %e, "Error processing frame")
            }
        }
    }
}

/// Parse `raw` and store its frame on the blocking pool.
pub async fn on_message(frames: &Arc<FrameStore>, raw: &str) -> IngestOutcome {
    let frame = match parse_frame_message(raw) {
        Ok(frame) => frame,
        Err(MessageError::MissingFrame) => return IngestOutcome::MissingFrame,
        Err(e) => return IngestOutcome::Malformed(e),
    };

    let store = Arc::clone(frames);
    match tokio::task::spawn_blocking(move || store.save(&frame)).await {
        Ok(Ok(stored)) => IngestOutcome::Stored(stored),
        Ok(Err(e)) => IngestOutcome::Failed(e),
        Err(e) => IngestOutcome::Failed(FrameError::Io(std::io::Error::other(e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use image::{Rgb, RgbImage};
    use posecam_core::codec::{encode_jpeg, to_base64};

    fn store() -> (tempfile::TempDir, Arc<FrameStore>) {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(FrameStore::open(tmp.path()).unwrap());
        (tmp, store)
    }

    fn frame_message() -> String {
        let img = RgbImage::from_pixel(4, 4, Rgb([0, 0, 255]));
        let payload = to_base64(&encode_jpeg(&img, 80).unwrap());
        serde_json::json!({ "frame": payload, "timestamp": 1 }).to_string()
    }

    #[tokio::test]
    async fn valid_frame_is_stored() {
        let (_tmp, frames) = store();

        let outcome = on_message(&frames, &frame_message()).await;

        assert_matches!(outcome, IngestOutcome::Stored(StoredFrame { index: 0, .. }));
    }

    #[tokio::test]
    async fn missing_frame_key_is_reported() {
        let (_tmp, frames) = store();

        let outcome = on_message(&frames, r#"{"not_frame": "x"}"#).await;

        assert_matches!(outcome, IngestOutcome::MissingFrame);
    }

    #[tokio::test]
    async fn non_json_is_malformed() {
        let (_tmp, frames) = store();

        let outcome = on_message(&frames, "hello").await;

        assert_matches!(outcome, IngestOutcome::Malformed(MessageError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn undecodable_frame_fails_without_writing() {
        let (tmp, frames) = store();

        let outcome = on_message(&frames, r#"{"frame": "aGVsbG8="}"#).await;

        assert_matches!(outcome, IngestOutcome::Failed(FrameError::Image(_)));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
