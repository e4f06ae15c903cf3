//! Post and Comment API Tests

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::TestApp;

fn png() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3, 4]
}

#[tokio::test]
async fn test_make_post_with_image() {
    let app = TestApp::new();
    let (user, token) = app.user("alice");
    app.create_chat(&token, "tech").await;

    let response = app
        .post_as("/make_post/tech", &token)
        .multipart(
            MultipartForm::new()
                .add_text("title", "Hello")
                .add_text("body", "First post")
                .add_part(
                    "image",
                    Part::bytes(png()).file_name("Cat.PNG").mime_type("image/png"),
                ),
        )
        .await;

    response.assert_status_ok();
    let flash: Value = response.json();
    assert_eq!(flash["message"], "Your new post is now live!");
    assert_eq!(flash["redirect"], "/chat/tech");

    let post_id = app.store.latest_post_id().unwrap();
    let page: Value = app.get(&format!("/post/{}", post_id)).await.json();
    let post = &page["post"];
    assert_eq!(post["title"], "Hello");
    assert_eq!(post["author"], "alice");
    assert_eq!(post["author_id"], user.id);
    assert_eq!(post["chat"], "tech");
    assert_eq!(post["score"], 0);

    let filename = post["image"]["filename"].as_str().unwrap();
    assert!(filename.ends_with(".png"));
    assert!(app.images.contains(filename));
    assert_eq!(
        post["image"]["url"],
        format!("/static/uploads/{}", filename)
    );
}

#[tokio::test]
async fn test_empty_file_part_means_no_image() {
    let app = TestApp::new();
    let (_, token) = app.user("alice");
    app.create_chat(&token, "tech").await;

    app.post_as("/make_post", &token)
        .multipart(
            MultipartForm::new()
                .add_text("chat_name", "tech")
                .add_text("title", "No picture")
                .add_part("image", Part::bytes(Vec::<u8>::new()).file_name("")),
        )
        .await
        .assert_status_ok();

    let post_id = app.store.latest_post_id().unwrap();
    let page: Value = app.get(&format!("/post/{}", post_id)).await.json();
    assert!(page["post"]["image"].is_null());
    assert_eq!(app.images.len(), 0);
}

#[tokio::test]
async fn test_make_post_rejects_non_image() {
    let app = TestApp::new();
    let (_, token) = app.user("alice");
    app.create_chat(&token, "tech").await;

    let response = app
        .post_as("/make_post/tech", &token)
        .multipart(
            MultipartForm::new()
                .add_text("title", "Script")
                .add_part("image", Part::bytes(b"#!/bin/sh".to_vec()).file_name("run.sh")),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["field"], "image");
    assert_eq!(body["errors"][0]["message"], "Image Only!");
    assert_eq!(app.store.post_count(), 0);
    assert_eq!(app.images.len(), 0);
}

#[tokio::test]
async fn test_make_post_in_unknown_chat() {
    let app = TestApp::new();
    let (_, token) = app.user("alice");

    let response = app
        .post_as("/make_post/nowhere", &token)
        .multipart(MultipartForm::new().add_text("title", "Lost"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["field"], "chat_name");
    assert_eq!(body["errors"][0]["message"], "Not a valid choice");
}

#[tokio::test]
async fn test_make_post_requires_title() {
    let app = TestApp::new();
    let (_, token) = app.user("alice");
    app.create_chat(&token, "tech").await;

    let response = app
        .post_as("/make_post/tech", &token)
        .multipart(MultipartForm::new().add_text("title", "   "))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["errors"][0]["field"], "title");
}

#[tokio::test]
async fn test_oversized_upload_is_413() {
    let app = TestApp::new();
    let (_, token) = app.user("alice");
    app.create_chat(&token, "tech").await;

    let response = app
        .post_as("/make_post/tech", &token)
        .multipart(
            MultipartForm::new()
                .add_text("title", "Huge")
                .add_part(
                    "image",
                    Part::bytes(vec![0u8; 128 * 1024]).file_name("huge.png"),
                ),
        )
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.store.post_count(), 0);
}

#[tokio::test]
async fn test_make_post_form_lists_chats() {
    let app = TestApp::new();
    let (_, token) = app.user("alice");
    app.create_chat(&token, "tech").await;
    app.create_chat(&token, "art").await;

    let form: Value = app.get_as("/make_post/tech", &token).await.json();

    assert_eq!(form["chat_name"], "tech");
    assert_eq!(form["chats"], json!(["art", "tech"]));
}

#[tokio::test]
async fn test_comments_newest_first_with_anonymous_author() {
    let app = TestApp::new();
    let (_, token) = app.user("alice");
    app.create_chat(&token, "tech").await;
    let post_id = app.create_post(&token, "tech", "Hello").await;
    let path = format!("/post/{}", post_id);

    let flash: Value = app
        .post_as(&path, &token)
        .form(&[("body", "signed comment")])
        .await
        .json();
    assert_eq!(flash["message"], "Your comment is now live!");
    assert_eq!(flash["redirect"], path);

    app.post(&path)
        .form(&[("body", "anonymous comment")])
        .await
        .assert_status_ok();

    let page: Value = app.get(&path).await.json();
    let comments = page["comments"]["items"].as_array().unwrap();
    assert_eq!(comments[0]["body"], "anonymous comment");
    assert!(comments[0]["author"].is_null());
    assert_eq!(comments[1]["author"], "alice");
    assert_eq!(page["post"]["comment_count"], 2);
}

#[tokio::test]
async fn test_reply_must_stay_on_same_post() {
    let app = TestApp::new();
    let (_, token) = app.user("alice");
    app.create_chat(&token, "tech").await;
    let first = app.create_post(&token, "tech", "First").await;
    let second = app.create_post(&token, "tech", "Second").await;

    app.post_as(&format!("/post/{}", first), &token)
        .form(&[("body", "parent")])
        .await
        .assert_status_ok();
    let page: Value = app.get(&format!("/post/{}", first)).await.json();
    let parent_id = page["comments"]["items"][0]["id"].as_i64().unwrap();

    let response = app
        .post_as(&format!("/post/{}", first), &token)
        .json(&json!({ "body": "reply", "parent_id": parent_id }))
        .await;
    response.assert_status_ok();

    let response = app
        .post_as(&format!("/post/{}", second), &token)
        .json(&json!({ "body": "misplaced", "parent_id": parent_id }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["errors"][0]["field"], "parent_id");

    let page: Value = app.get(&format!("/post/{}", first)).await.json();
    assert_eq!(page["comments"]["items"][0]["parent_id"], parent_id);
}

#[tokio::test]
async fn test_empty_comment_is_rejected() {
    let app = TestApp::new();
    let (_, token) = app.user("alice");
    app.create_chat(&token, "tech").await;
    let post_id = app.create_post(&token, "tech", "Hello").await;

    let response = app
        .post_as(&format!("/post/{}", post_id), &token)
        .form(&[("body", "")])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(app.store.comment_count(), 0);
}

#[tokio::test]
async fn test_unknown_post_is_404() {
    let app = TestApp::new();

    let response = app.get("/post/424242").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["message"], "Post 424242 not found.");
}

#[tokio::test]
async fn test_delete_post_by_author() {
    let app = TestApp::new();
    let (_, token) = app.user("alice");
    app.create_chat(&token, "tech").await;
    app.post_as("/make_post/tech", &token)
        .multipart(
            MultipartForm::new()
                .add_text("title", "Doomed")
                .add_part("image", Part::bytes(png()).file_name("doomed.gif")),
        )
        .await
        .assert_status_ok();
    let post_id = app.store.latest_post_id().unwrap();
    assert_eq!(app.images.len(), 1);

    let flash: Value = app
        .post_as(&format!("/delete_post/{}", post_id), &token)
        .await
        .json();

    assert_eq!(flash["message"], "You deleted the post.");
    assert_eq!(flash["redirect"], "/chat/tech");
    assert_eq!(app.store.post_count(), 0);
    assert_eq!(app.images.len(), 0);
    app.get(&format!("/post/{}", post_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_creator_may_delete_any_post() {
    let app = TestApp::new();
    let (_, owner) = app.user("owner");
    let (_, author) = app.user("author");
    app.create_chat(&owner, "tech").await;
    let post_id = app.create_post(&author, "tech", "Off topic").await;

    let response = app
        .post_as(&format!("/delete_post/{}", post_id), &owner)
        .add_header(header::REFERER, HeaderValue::from_static("/popular"))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["redirect"], "/popular");
    assert_eq!(app.store.post_count(), 0);
}

#[tokio::test]
async fn test_stranger_cannot_delete_post() {
    let app = TestApp::new();
    let (_, owner) = app.user("owner");
    let (_, stranger) = app.user("stranger");
    app.create_chat(&owner, "tech").await;
    let post_id = app.create_post(&owner, "tech", "Mine").await;

    let response = app
        .post_as(&format!("/delete_post/{}", post_id), &stranger)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<Value>()["message"],
        "You cannot delete this post."
    );
    assert_eq!(app.store.post_count(), 1);
}

#[tokio::test]
async fn test_can_delete_flag_follows_viewer() {
    let app = TestApp::new();
    let (_, owner) = app.user("owner");
    let (_, stranger) = app.user("stranger");
    app.create_chat(&owner, "tech").await;
    let post_id = app.create_post(&owner, "tech", "Mine").await;
    let path = format!("/post/{}", post_id);

    let as_owner: Value = app.get_as(&path, &owner).await.json();
    let as_stranger: Value = app.get_as(&path, &stranger).await.json();
    let anonymous: Value = app.get(&path).await.json();

    assert_eq!(as_owner["can_delete"], true);
    assert_eq!(as_stranger["can_delete"], false);
    assert_eq!(anonymous["can_delete"], false);
}

#[tokio::test]
async fn test_comment_on_unknown_post_is_404_even_when_invalid() {
    let app = TestApp::new();

    let response = app.post("/post/999").form(&[("body", "")]).await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["message"], "Post 999 not found.");
    assert_eq!(app.store.comment_count(), 0);
}

#[tokio::test]
async fn test_non_numeric_post_id_is_404() {
    let app = TestApp::new();
    let (_, token) = app.user("alice");

    app.get("/post/abc").await.assert_status(StatusCode::NOT_FOUND);
    app.post("/post/abc")
        .form(&[("body", "Hi")])
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.post_as("/delete_post/abc", &token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
