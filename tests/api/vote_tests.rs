//! Vote API Tests

use axum::http::{header, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::Value;

use openchat::domain::VoteTarget;

use crate::common::TestApp;

async fn post_score(app: &TestApp, post_id: i64) -> i64 {
    let page: Value = app.get(&format!("/post/{}", post_id)).await.json();
    page["post"]["score"].as_i64().unwrap()
}

#[tokio::test]
async fn test_vote_withdraw_downvote_scenario() {
    let app = TestApp::new();
    let (_, a) = app.user("a");
    let (_, b) = app.user("b");
    app.create_chat(&a, "tech").await;
    app.get_as("/subscribe/tech", &a).await.assert_status_ok();
    let post_id = app.create_post(&a, "tech", "Hello").await;

    let response: Value = app
        .get_as(&format!("/upvote/{}", post_id), &b)
        .await
        .json();
    assert_eq!(response["message"], "You upvoted the post!");
    assert_eq!(response["redirect"], format!("/post/{}", post_id));
    assert_eq!(response["vote"]["score"], 1);
    assert_eq!(post_score(&app, post_id).await, 1);

    let response: Value = app
        .get_as(&format!("/withdraw_vote/{}", post_id), &b)
        .await
        .json();
    assert_eq!(response["message"], "You withdrew your vote.");
    assert_eq!(post_score(&app, post_id).await, 0);

    let response: Value = app
        .get_as(&format!("/downvote/{}", post_id), &b)
        .await
        .json();
    assert_eq!(response["message"], "You downvoted the post!");
    assert_eq!(post_score(&app, post_id).await, -1);
}

#[tokio::test]
async fn test_repeated_vote_keeps_one_row() {
    let app = TestApp::new();
    let (_, a) = app.user("a");
    let (_, b) = app.user("b");
    app.create_chat(&a, "tech").await;
    let post_id = app.create_post(&a, "tech", "Hello").await;

    for _ in 0..3 {
        app.get_as(&format!("/upvote/{}", post_id), &b)
            .await
            .assert_status_ok();
    }

    assert_eq!(app.store.vote_rows(VoteTarget::Post(post_id)), 1);
    assert_eq!(post_score(&app, post_id).await, 1);
}

#[tokio::test]
async fn test_switching_polarity_replaces_vote() {
    let app = TestApp::new();
    let (_, a) = app.user("a");
    let (_, b) = app.user("b");
    app.create_chat(&a, "tech").await;
    let post_id = app.create_post(&a, "tech", "Hello").await;

    app.get_as(&format!("/upvote/{}", post_id), &a).await.assert_status_ok();
    app.get_as(&format!("/upvote/{}", post_id), &b).await.assert_status_ok();
    app.get_as(&format!("/downvote/{}", post_id), &b).await.assert_status_ok();

    let page: Value = app.get(&format!("/post/{}", post_id)).await.json();
    assert_eq!(page["post"]["upvotes"], 1);
    assert_eq!(page["post"]["downvotes"], 1);
    assert_eq!(page["post"]["score"], 0);
    assert_eq!(app.store.vote_rows(VoteTarget::Post(post_id)), 2);
}

#[tokio::test]
async fn test_withdraw_without_vote_is_noop() {
    let app = TestApp::new();
    let (_, a) = app.user("a");
    app.create_chat(&a, "tech").await;
    let post_id = app.create_post(&a, "tech", "Hello").await;

    let response = app
        .get_as(&format!("/withdraw_vote/{}", post_id), &a)
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["vote"]["score"], 0);
}

#[tokio::test]
async fn test_vote_on_missing_post_is_404() {
    let app = TestApp::new();
    let (_, a) = app.user("a");

    let response = app.get_as("/upvote/999", &a).await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["message"], "Post not found.");
}

#[tokio::test]
async fn test_voting_requires_login() {
    let app = TestApp::new();

    app.get("/upvote/1")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_comment_votes_use_comment_score() {
    let app = TestApp::new();
    let (_, a) = app.user("a");
    let (_, b) = app.user("b");
    app.create_chat(&a, "tech").await;
    let post_id = app.create_post(&a, "tech", "Hello").await;
    app.post_as(&format!("/post/{}", post_id), &a)
        .form(&[("body", "nice")])
        .await
        .assert_status_ok();
    let page: Value = app.get(&format!("/post/{}", post_id)).await.json();
    let comment_id = page["comments"]["items"][0]["id"].as_i64().unwrap();

    let response = app
        .get_as(&format!("/upvote_comment/{}", comment_id), &a)
        .add_header(header::REFERER, HeaderValue::from_static("/feed"))
        .await;
    let flash: Value = response.json();
    assert_eq!(flash["message"], "You voted on the comment!");
    assert_eq!(flash["redirect"], "/feed");

    let flash: Value = app
        .get_as(&format!("/downvote_comment/{}", comment_id), &b)
        .await
        .json();
    assert_eq!(flash["redirect"], format!("/post/{}", post_id));
    assert_eq!(flash["vote"]["score"], 0);

    app.get_as(&format!("/withdraw_vote_comment/{}", comment_id), &b)
        .await
        .assert_status_ok();

    let page: Value = app.get(&format!("/post/{}", post_id)).await.json();
    assert_eq!(page["comments"]["items"][0]["score"], 1);
    // comment votes never touch the post score
    assert_eq!(page["post"]["score"], 0);
}

#[tokio::test]
async fn test_vote_on_missing_comment_is_404() {
    let app = TestApp::new();
    let (_, a) = app.user("a");

    let response = app.get_as("/downvote_comment/31337", &a).await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["message"], "Comment not found.");
}

#[tokio::test]
async fn test_deleting_post_drops_its_votes() {
    let app = TestApp::new();
    let (_, a) = app.user("a");
    let (_, b) = app.user("b");
    app.create_chat(&a, "tech").await;
    let post_id = app.create_post(&a, "tech", "Hello").await;
    app.get_as(&format!("/upvote/{}", post_id), &b).await.assert_status_ok();

    app.post_as(&format!("/delete_post/{}", post_id), &a)
        .await
        .assert_status_ok();

    assert_eq!(app.store.vote_rows(VoteTarget::Post(post_id)), 0);
}

#[tokio::test]
async fn test_vote_on_non_numeric_id_is_404() {
    let app = TestApp::new();
    let (_, a) = app.user("a");

    for path in ["/upvote/abc", "/withdraw_vote/1x", "/downvote_comment/abc"] {
        app.get_as(path, &a).await.assert_status(StatusCode::NOT_FOUND);
    }
}
