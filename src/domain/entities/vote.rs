//! Vote entity and repository trait.
//!
//! Maps to the `post_votes` and `comment_votes` tables in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{VoteTally, VoteTarget};
use crate::shared::error::AppError;

/// A user's up- or downvote on a post or comment.
///
/// Maps to `post_votes` / `comment_votes`:
/// - user_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE (composite PK)
/// - post_id | comment_id: BIGINT NOT NULL (composite PK)
/// - liked: BOOLEAN NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// The composite primary key allows one vote per user per target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub user_id: i64,
    pub target: VoteTarget,

    /// true for an upvote, false for a downvote
    pub liked: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository trait for Vote data access operations.
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// The user's current vote on a target, if any.
    async fn find(&self, user_id: i64, target: VoteTarget) -> Result<Option<Vote>, AppError>;

    /// Insert a vote, or overwrite the polarity of the existing one.
    async fn upsert(&self, user_id: i64, target: VoteTarget, liked: bool)
        -> Result<Vote, AppError>;

    /// Remove the user's vote on a target. Returns whether a row was removed.
    async fn delete(&self, user_id: i64, target: VoteTarget) -> Result<bool, AppError>;

    /// Count the upvotes and downvotes on a target.
    async fn tally(&self, target: VoteTarget) -> Result<VoteTally, AppError>;
}
