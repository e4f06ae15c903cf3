//! Authentication API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::TestApp;

fn registration(username: &str, email: &str) -> Value {
    json!({
        "username": username,
        "email": email,
        "password": "correct horse battery",
    })
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new();

    let response = app
        .post("/auth/register")
        .json(&registration("alice", "alice@example.com"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["score"], 0);

    let response = app
        .post("/auth/login")
        .json(&json!({ "username": "alice", "password": "correct horse battery" }))
        .await;

    response.assert_status_ok();
    let token = response.json::<Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let home: Value = app.get_as("/index", &token).await.json();
    assert_eq!(home["user"]["username"], "alice");
}

#[tokio::test]
async fn test_login_with_wrong_password_fails() {
    let app = TestApp::new();
    app.post("/auth/register")
        .json(&registration("bob", "bob@example.com"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = app
        .post("/auth/login")
        .json(&json!({ "username": "bob", "password": "not the password" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>()["message"],
        "Invalid username or password"
    );
}

#[tokio::test]
async fn test_register_rejects_taken_username_ignoring_case() {
    let app = TestApp::new();
    app.user("carol");

    let response = app
        .post("/auth/register")
        .json(&registration("CAROL", "someone@example.com"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["field"], "username");
    assert_eq!(
        body["errors"][0]["message"],
        "Please use a different username."
    );
}

#[tokio::test]
async fn test_register_rejects_taken_email() {
    let app = TestApp::new();
    app.user("dave");

    let response = app
        .post("/auth/register")
        .json(&registration("david", "dave@example.com"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["errors"][0]["field"], "email");
}

#[tokio::test]
async fn test_register_validates_fields() {
    let app = TestApp::new();

    let response = app
        .post("/auth/register")
        .json(&json!({ "username": "bad/name", "email": "nope", "password": "short" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let mut fields: Vec<String> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect();
    fields.sort();
    fields.dedup();
    assert_eq!(fields, vec!["email", "password", "username"]);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::new();

    app.get("/feed").await.assert_status(StatusCode::UNAUTHORIZED);
    app.get_as("/feed", "not-a-token")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_authenticated_request_refreshes_last_seen() {
    let app = TestApp::new();
    let (user, token) = app.user("erin");

    app.get_as("/feed", &token).await.assert_status_ok();

    let seen = app.store.user(user.id).unwrap().last_seen;
    assert!(seen > user.last_seen);
}

#[tokio::test]
async fn test_token_for_deleted_account_is_rejected() {
    let app = TestApp::new();
    let token = app.token(9999);

    app.get_as("/feed", &token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
