//! Health Check API Tests

use axum::http::{header, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::TestApp;

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new();

    let response = app.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new();

    let body: Value = app.get("/health/live").await.json();

    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_readiness_reports_database() {
    let app = TestApp::new();

    let response = app.get("/health/ready").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_unavailable_without_database() {
    let app = TestApp::with_health(false);

    let response = app.get("/health/ready").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["database"]["message"], "Database connection failed");
}

#[tokio::test]
async fn test_metrics_exposes_prometheus_text() {
    let app = TestApp::new();
    app.get("/health").await.assert_status_ok();

    let response = app.get("/metrics").await;

    response.assert_status_ok();
    let content_type = response.header(header::CONTENT_TYPE);
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));
    assert!(response.text().contains("openchat_http_requests_total"));
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let app = TestApp::new();

    let response = app.get("/no/such/page").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert_eq!(response.header("x-frame-options"), "DENY");
}
