//! Chat API Tests

use axum::http::{header, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::TestApp;

#[tokio::test]
async fn test_create_chat_subscribes_creator() {
    let app = TestApp::new();
    let (user, token) = app.user("alice");

    let response = app
        .post_as("/create_chat", &token)
        .form(&[("name", "tech"), ("about", "All things tech")])
        .await;

    response.assert_status_ok();
    let flash: Value = response.json();
    assert_eq!(flash["message"], "Your new chat is now live!");
    assert_eq!(flash["redirect"], "/chat/tech");

    let page: Value = app.get_as("/chat/tech", &token).await.json();
    assert_eq!(page["chat"]["name"], "tech");
    assert_eq!(page["chat"]["creator_id"], user.id);
    assert_eq!(page["chat"]["subscriber_count"], 1);
    assert_eq!(page["subscribed"], true);
    assert_eq!(page["can_edit"], true);
}

#[tokio::test]
async fn test_chat_names_are_unique_ignoring_case() {
    let app = TestApp::new();
    let (_, token) = app.user("alice");
    app.create_chat(&token, "Foo").await;

    let response = app
        .post_as("/create_chat", &token)
        .json(&json!({ "name": "foo", "about": "Again" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["field"], "name");
    assert_eq!(
        body["errors"][0]["message"],
        "That chat name is already taken."
    );
}

#[tokio::test]
async fn test_chat_name_rejects_slash() {
    let app = TestApp::new();
    let (_, token) = app.user("alice");

    let response = app
        .post_as("/create_chat", &token)
        .form(&[("name", "a/b"), ("about", "Nope")])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["errors"][0]["field"], "name");
}

#[tokio::test]
async fn test_chat_lookup_ignores_case() {
    let app = TestApp::new();
    let (_, token) = app.user("alice");
    app.create_chat(&token, "Rust").await;

    let page: Value = app.get("/chat/rust").await.json();

    assert_eq!(page["chat"]["name"], "Rust");
    assert!(page.get("subscribed").is_none() || page["subscribed"].is_null());
    assert_eq!(page["can_edit"], false);
}

#[tokio::test]
async fn test_unknown_chat_is_404() {
    let app = TestApp::new();

    let response = app.get("/chat/nowhere").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["message"], "Chat nowhere not found.");
}

#[tokio::test]
async fn test_only_creator_edits_chat() {
    let app = TestApp::new();
    let (_, owner) = app.user("owner");
    let (_, other) = app.user("other");
    app.create_chat(&owner, "tech").await;

    let form: Value = app.get_as("/edit_chat/tech", &owner).await.json();
    assert_eq!(form["about"], "About this chat");

    let response = app
        .post_as("/edit_chat/tech", &other)
        .form(&[("about", "Hijacked")])
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<Value>()["message"],
        "You cannot edit this chat."
    );

    let response = app
        .post_as("/edit_chat/tech", &owner)
        .form(&[("about", "Hardware and software")])
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["message"],
        "Your changes have been saved."
    );

    let page: Value = app.get("/chat/tech").await.json();
    assert_eq!(page["chat"]["about"], "Hardware and software");
}

#[tokio::test]
async fn test_subscribe_is_idempotent() {
    let app = TestApp::new();
    let (_, owner) = app.user("owner");
    let (reader, token) = app.user("reader");
    app.create_chat(&owner, "tech").await;

    for _ in 0..2 {
        let flash: Value = app.get_as("/subscribe/tech", &token).await.json();
        assert_eq!(flash["message"], "You subscribed to chat/tech!");
        assert_eq!(flash["redirect"], "/chat/tech");
    }

    let page: Value = app.get_as("/chat/tech", &token).await.json();
    let chat_id = page["chat"]["id"].as_i64().unwrap();
    assert_eq!(app.store.subscription_rows(reader.id, chat_id), 1);
    assert_eq!(page["chat"]["subscriber_count"], 2);
    assert_eq!(page["subscribed"], true);
}

#[tokio::test]
async fn test_unsubscribe_when_not_subscribed_is_noop() {
    let app = TestApp::new();
    let (_, owner) = app.user("owner");
    let (_, token) = app.user("reader");
    app.create_chat(&owner, "tech").await;

    let response = app
        .get_as("/unsubscribe/tech", &token)
        .add_header(header::REFERER, HeaderValue::from_static("/explore_chats"))
        .await;

    response.assert_status_ok();
    let flash: Value = response.json();
    assert_eq!(flash["message"], "You unsubscribed from chat/tech!");
    assert_eq!(flash["redirect"], "/explore_chats");

    let page: Value = app.get("/chat/tech").await.json();
    assert_eq!(page["chat"]["subscriber_count"], 1);
}

#[tokio::test]
async fn test_subscribe_to_unknown_chat_is_404() {
    let app = TestApp::new();
    let (_, token) = app.user("reader");

    app.get_as("/subscribe/nowhere", &token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_posts_are_paginated_newest_first() {
    let app = TestApp::new();
    let (_, token) = app.user("alice");
    app.create_chat(&token, "tech").await;
    for title in ["first", "second", "third"] {
        app.create_post(&token, "tech", title).await;
    }

    let page: Value = app.get("/chat/tech").await.json();
    let titles: Vec<&str> = page["posts"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second"]);
    assert_eq!(page["posts"]["next_url"], "/chat/tech?page=2");
    assert!(page["posts"]["prev_url"].is_null());

    let page: Value = app.get("/chat/tech?page=2").await.json();
    assert_eq!(page["posts"]["items"][0]["title"], "first");
    assert_eq!(page["posts"]["prev_url"], "/chat/tech?page=1");
}

#[tokio::test]
async fn test_edit_unknown_chat_is_404_even_when_invalid() {
    let app = TestApp::new();
    let (_, token) = app.user("owner");
    let about = "x".repeat(4001);

    app.post_as("/edit_chat/nochat", &token)
        .form(&[("about", about.as_str())])
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.create_chat(&token, "tech").await;
    let response = app
        .post_as("/edit_chat/tech", &token)
        .form(&[("about", about.as_str())])
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["errors"][0]["field"], "about");
}

#[tokio::test]
async fn test_is_subscribed_tracks_membership() {
    let app = TestApp::new();
    let (owner, owner_token) = app.user("owner");
    let (reader, reader_token) = app.user("reader");
    app.create_chat(&owner_token, "tech").await;
    let chat_id = app.state.services.chats.get("tech").await.unwrap().id;
    let subscriptions = &app.state.services.subscriptions;

    assert!(subscriptions.is_subscribed(owner.id, chat_id).await.unwrap());
    assert!(!subscriptions.is_subscribed(reader.id, chat_id).await.unwrap());

    app.get_as("/subscribe/tech", &reader_token).await.assert_status_ok();
    assert!(subscriptions.is_subscribed(reader.id, chat_id).await.unwrap());

    app.get_as("/unsubscribe/tech", &reader_token).await.assert_status_ok();
    assert!(!subscriptions.is_subscribed(reader.id, chat_id).await.unwrap());
}
