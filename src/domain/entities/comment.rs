//! Comment entity and repository trait.
//!
//! Maps to the `comments` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PageRequest;
use crate::shared::error::AppError;

/// A comment on a post, optionally replying to another comment.
///
/// Maps to the `comments` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - body: VARCHAR(4000) NOT NULL
/// - author_id: BIGINT NULL REFERENCES users(id) ON DELETE SET NULL
/// - post_id: BIGINT NOT NULL REFERENCES posts(id) ON DELETE CASCADE
/// - parent_id: BIGINT NULL REFERENCES comments(id) ON DELETE CASCADE
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub body: String,

    /// None for anonymous comments
    pub author_id: Option<i64>,

    pub post_id: i64,

    /// Comment this one replies to
    pub parent_id: Option<i64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub const BODY_MAX_LEN: usize = 4000;
}

impl Default for Comment {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            body: String::new(),
            author_id: None,
            post_id: 0,
            parent_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields required to insert a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub body: String,
    pub author_id: Option<i64>,
    pub post_id: i64,
    pub parent_id: Option<i64>,
}

/// Repository trait for Comment data access operations.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find a comment by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError>;

    /// Insert a comment.
    async fn create(&self, comment: &NewComment) -> Result<Comment, AppError>;

    /// Comments on a post, newest first, up to `page.fetch_limit()` rows.
    async fn list_by_post(&self, post_id: i64, page: PageRequest)
        -> Result<Vec<Comment>, AppError>;

    /// Number of comments on a post.
    async fn count_by_post(&self, post_id: i64) -> Result<i64, AppError>;
}
