//! Feed, popular, explore and leaderboard listing tests

use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::TestApp;

fn field<'a>(listing: &'a Value, key: &str) -> Vec<&'a str> {
    listing["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item[key].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_feed_only_shows_subscribed_chats() {
    let app = TestApp::new();
    let (_, owner) = app.user("owner");
    let (_, reader) = app.user("reader");
    app.create_chat(&owner, "tech").await;
    app.create_chat(&owner, "art").await;
    app.create_post(&owner, "tech", "Rust 2.0").await;
    app.create_post(&owner, "art", "Watercolours").await;
    app.get_as("/subscribe/tech", &reader).await.assert_status_ok();

    let feed: Value = app.get_as("/feed", &reader).await.json();

    assert_eq!(field(&feed, "title"), vec!["Rust 2.0"]);
    assert!(feed["next_url"].is_null());
}

#[tokio::test]
async fn test_popular_orders_by_score() {
    let app = TestApp::new();
    let (_, a) = app.user("a");
    let (_, b) = app.user("b");
    app.create_chat(&a, "tech").await;
    let low = app.create_post(&a, "tech", "low").await;
    let high = app.create_post(&a, "tech", "high").await;
    app.create_post(&a, "tech", "middle").await;
    app.get_as(&format!("/upvote/{}", high), &a).await.assert_status_ok();
    app.get_as(&format!("/upvote/{}", high), &b).await.assert_status_ok();
    app.get_as(&format!("/downvote/{}", low), &b).await.assert_status_ok();

    let first: Value = app.get("/popular").await.json();
    let second: Value = app.get("/popular?page=2").await.json();

    assert_eq!(field(&first, "title"), vec!["high", "middle"]);
    assert_eq!(field(&second, "title"), vec!["low"]);
    assert_eq!(first["next_url"], "/popular?page=2");
    assert_eq!(second["prev_url"], "/popular?page=1");
}

#[tokio::test]
async fn test_popular_search_matches_title_or_body() {
    let app = TestApp::new();
    let (_, a) = app.user("a");
    app.create_chat(&a, "tech").await;
    app.create_post(&a, "tech", "Ferris").await;
    app.create_post(&a, "tech", "Gophers").await;

    let by_get: Value = app.get("/popular?search=Ferris").await.json();
    // create_post writes "<title> body" as the body
    let by_post: Value = app
        .post("/popular")
        .form(&[("search", "Gophers body")])
        .await
        .json();
    let blank: Value = app
        .post("/popular")
        .form(&[("search", "   ")])
        .await
        .json();
    let case_sensitive: Value = app.get("/popular?search=ferris").await.json();

    assert_eq!(field(&by_get, "title"), vec!["Ferris"]);
    assert_eq!(field(&by_post, "title"), vec!["Gophers"]);
    assert_eq!(field(&blank, "title").len(), 2);
    assert!(field(&case_sensitive, "title").is_empty());
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let app = TestApp::new();
    let (_, a) = app.user("a");
    app.create_chat(&a, "tech").await;
    app.create_post(&a, "tech", "100% done").await;
    app.create_post(&a, "tech", "halfway").await;

    let listing: Value = app.post("/popular").form(&[("search", "%")]).await.json();

    assert_eq!(field(&listing, "title"), vec!["100% done"]);
}

#[tokio::test]
async fn test_explore_orders_by_subscribers() {
    let app = TestApp::new();
    let (_, a) = app.user("a");
    let (_, b) = app.user("b");
    let (_, c) = app.user("c");
    app.create_chat(&a, "quiet").await;
    app.create_chat(&a, "busy").await;
    app.create_chat(&a, "medium").await;
    for token in [&b, &c] {
        app.get_as("/subscribe/busy", token).await.assert_status_ok();
    }
    app.get_as("/subscribe/medium", &b).await.assert_status_ok();

    let first: Value = app.get("/explore_chats").await.json();
    let second: Value = app.get("/explore_chats?page=2").await.json();

    assert_eq!(field(&first, "name"), vec!["busy", "medium"]);
    assert_eq!(first["items"][0]["subscriber_count"], 3);
    assert_eq!(field(&second, "name"), vec!["quiet"]);
}

#[tokio::test]
async fn test_explore_search_matches_name_or_about() {
    let app = TestApp::new();
    let (_, a) = app.user("a");
    app.create_chat(&a, "rustaceans").await;
    app.post_as("/create_chat", &a)
        .form(&[("name", "crabs"), ("about", "Crustacean fans")])
        .await
        .assert_status_ok();
    app.create_chat(&a, "gophers").await;

    let listing: Value = app
        .post("/explore_chats")
        .form(&[("search", "ustace")])
        .await
        .json();

    assert_eq!(field(&listing, "name"), vec!["rustaceans", "crabs"]);
}

#[tokio::test]
async fn test_leaderboard_ranks_by_post_score() {
    let app = TestApp::new();
    let (_, a) = app.user("ann");
    let (_, b) = app.user("ben");
    let (_, c) = app.user("cat");
    app.create_chat(&a, "tech").await;
    let post_id = app.create_post(&b, "tech", "Popular").await;
    for token in [&a, &b, &c] {
        app.get_as(&format!("/upvote/{}", post_id), token)
            .await
            .assert_status_ok();
    }

    let board: Value = app.get("/leaderboard").await.json();
    assert_eq!(field(&board, "username"), vec!["ben", "ann"]);
    assert_eq!(board["items"][0]["score"], 3);

    let searched: Value = app
        .post("/leaderboard")
        .form(&[("search", "ca")])
        .await
        .json();
    assert_eq!(field(&searched, "username"), vec!["cat"]);
}

#[tokio::test]
async fn test_invalid_page_falls_back_to_first() {
    let app = TestApp::new();
    let (_, a) = app.user("a");
    app.create_chat(&a, "tech").await;
    app.create_post(&a, "tech", "only").await;

    for query in ["?page=0", "?page=-3", "?page=abc"] {
        let listing: Value = app.get(&format!("/popular{}", query)).await.json();
        assert_eq!(listing["page"], 1);
        assert_eq!(field(&listing, "title"), vec!["only"]);
    }
}

#[tokio::test]
async fn test_search_post_without_body_lists_everything() {
    let app = TestApp::new();
    let (_, a) = app.user("a");
    app.create_chat(&a, "tech").await;
    app.create_post(&a, "tech", "Hello").await;

    let response = app.post("/popular").await;
    response.assert_status_ok();
    assert_eq!(field(&response.json::<Value>(), "title"), vec!["Hello"]);

    let response = app.post("/explore_chats").await;
    response.assert_status_ok();
    assert_eq!(field(&response.json::<Value>(), "name"), vec!["tech"]);

    let response = app.post("/leaderboard").await;
    response.assert_status_ok();
    assert_eq!(field(&response.json::<Value>(), "username"), vec!["a"]);
}
