//! Integration tests for `/api/hello` and `/api/echo`.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post_json, FakeDetector};
use serde_json::json;

#[tokio::test]
async fn hello_returns_greeting() {
    let app = build_test_app(FakeDetector::finds_nothing());
    let response = get(&app, "/api/hello").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn echo_returns_the_body_under_data() {
    let app = build_test_app(FakeDetector::finds_nothing());
    let response = post_json(&app, "/api/echo", r#"{"a":1}"#).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], json!({"a": 1}));
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn echo_rejects_empty_object() {
    let app = build_test_app(FakeDetector::finds_nothing());
    let response = post_json(&app, "/api/echo", "{}").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json, json!({"error": "No data provided"}));
}

#[tokio::test]
async fn echo_rejects_missing_body() {
    let app = build_test_app(FakeDetector::finds_nothing());
    let response = post_json(&app, "/api/echo", "").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn echo_rejects_invalid_json() {
    let app = build_test_app(FakeDetector::finds_nothing());
    let response = post_json(&app, "/api/echo", "{not json").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn echo_accepts_non_object_json() {
    let app = build_test_app(FakeDetector::finds_nothing());
    let response = post_json(&app, "/api/echo", "[1, 2, 3]").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!([1, 2, 3]));
}
