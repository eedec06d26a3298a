//! `posecam-core` library crate.
//!
//! Domain logic shared by the two services: landmark types, the injected
//! vision capability, annotation, image codecs, upload persistence and the
//! frame store used by the ingest service.

pub mod annotate;
pub mod codec;
pub mod config;
pub mod detector;
pub mod error;
pub mod frames;
pub mod landmarks;
pub mod pipeline;
pub mod storage;
