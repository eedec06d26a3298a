//! Request handlers for the Detection API.

pub mod greeting;
pub mod upload;
