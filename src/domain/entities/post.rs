//! Post entity and repository trait.
//!
//! Maps to the `posts` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::image::{Image, NewImage};
use crate::domain::value_objects::PageRequest;
use crate::shared::error::AppError;

/// A post submitted to a chat.
///
/// Maps to the `posts` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - title: VARCHAR(300) NOT NULL
/// - body: VARCHAR(4000) NOT NULL DEFAULT ''
/// - author_id: BIGINT NULL REFERENCES users(id) ON DELETE SET NULL
/// - chat_id: BIGINT NOT NULL REFERENCES chats(id) ON DELETE CASCADE
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,

    /// None once the author's account is gone
    pub author_id: Option<i64>,

    pub chat_id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub const TITLE_MAX_LEN: usize = 300;
    pub const BODY_MAX_LEN: usize = 4000;

    /// Check if a user wrote this post.
    pub fn is_author(&self, user_id: i64) -> bool {
        self.author_id == Some(user_id)
    }
}

impl Default for Post {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title: String::new(),
            body: String::new(),
            author_id: None,
            chat_id: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields required to insert a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub author_id: i64,
    pub chat_id: i64,
}

/// A post together with its net score.
#[derive(Debug, Clone)]
pub struct PostScore {
    pub post: Post,
    pub score: i64,
}

/// Repository trait for Post data access operations.
///
/// Listings are newest first unless stated otherwise and return up to
/// `page.fetch_limit()` rows.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find a post by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError>;

    /// Insert a post and, when given, its attachment in one transaction.
    async fn create(&self, post: &NewPost, image: Option<&NewImage>) -> Result<Post, AppError>;

    /// Delete a post with its votes, comments and attachment row.
    ///
    /// Returns the removed attachment so its file can be cleaned up.
    async fn delete(&self, id: i64) -> Result<Option<Image>, AppError>;

    /// Posts in a chat.
    async fn list_by_chat(&self, chat_id: i64, page: PageRequest) -> Result<Vec<Post>, AppError>;

    /// Posts written by a user.
    async fn list_by_author(
        &self,
        author_id: i64,
        page: PageRequest,
    ) -> Result<Vec<Post>, AppError>;

    /// Posts from every chat the user subscribes to.
    async fn list_subscribed(&self, user_id: i64, page: PageRequest)
        -> Result<Vec<Post>, AppError>;

    /// Posts ordered by score, highest first, optionally filtered by a
    /// substring of the title or body.
    async fn popular(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<PostScore>, AppError>;
}
