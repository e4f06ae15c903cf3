//! Image attachment entity and repository trait.
//!
//! Maps to the `images` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// An uploaded image, attached to at most one post.
///
/// Maps to the `images` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - post_id: BIGINT NULL UNIQUE REFERENCES posts(id) ON DELETE CASCADE
/// - filename: TEXT NOT NULL
/// - url: TEXT NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// The unique `post_id` keeps a post to a single attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    pub post_id: Option<i64>,

    /// Stored filename inside the upload directory
    pub filename: String,

    /// Public URL the file is served from
    pub url: String,

    pub created_at: DateTime<Utc>,
}

/// Fields required to insert an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub filename: String,
    pub url: String,
}

/// Repository trait for Image data access operations.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Find the attachment of a post.
    async fn find_by_post(&self, post_id: i64) -> Result<Option<Image>, AppError>;
}
