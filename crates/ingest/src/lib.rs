//! Frame Ingest Service library.
//!
//! A WebSocket listener that stores base64 frames pushed by clients. The
//! binary entrypoint lives in `main.rs`; integration tests build the same
//! router from here.

pub mod app;
pub mod config;
pub mod state;
pub mod ws;
