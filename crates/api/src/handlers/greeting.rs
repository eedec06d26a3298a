//! Connectivity probes: a fixed greeting and a JSON echo.

use axum::body::Bytes;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub message: &'static str,
    pub data: Value,
}

/// GET /api/hello
pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello from the backend!",
    })
}

/// POST /api/echo
///
/// Returns the JSON body under `data`. Missing, unparseable or empty
/// payloads (`null`, `false`, `0`, `""`, `[]`, `{}`) are rejected.
pub async fn echo(body: Bytes) -> AppResult<Json<EchoResponse>> {
    let data: Value = serde_json::from_slice(&body)
        .ok()
        .filter(|v| !is_empty_payload(v))
        .ok_or_else(|| AppError::BadRequest("No data provided".into()))?;

    Ok(Json(EchoResponse {
        message: "Data received successfully",
        data,
    }))
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
