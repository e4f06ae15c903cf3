//! Vote Service
//!
//! Casting, flipping and withdrawing votes on posts and comments. Scores are
//! recomputed from the vote rows on every read.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{CommentRepository, PostRepository, VoteRepository, VoteTarget};
use crate::infrastructure::metrics::{record_forum_action, ForumAction};
use crate::shared::error::AppError;

/// State of a target after a vote change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteOutcome {
    pub target: VoteTarget,
    /// Post the target is, or the post the comment belongs to
    pub post_id: i64,
    pub score: i64,
}

/// Vote service trait
#[async_trait]
pub trait VoteService: Send + Sync {
    /// Record the user's vote, replacing any earlier one on the same target
    async fn vote(
        &self,
        user_id: i64,
        target: VoteTarget,
        liked: bool,
    ) -> Result<VoteOutcome, VoteError>;

    async fn upvote(&self, user_id: i64, target: VoteTarget) -> Result<VoteOutcome, VoteError> {
        self.vote(user_id, target, true).await
    }

    async fn downvote(&self, user_id: i64, target: VoteTarget) -> Result<VoteOutcome, VoteError> {
        self.vote(user_id, target, false).await
    }

    /// Remove the user's vote; a no-op when there is none
    async fn withdraw_vote(
        &self,
        user_id: i64,
        target: VoteTarget,
    ) -> Result<VoteOutcome, VoteError>;

    /// Likes minus dislikes
    async fn score(&self, target: VoteTarget) -> Result<i64, VoteError>;
}

/// Vote service errors
#[derive(Debug, thiserror::Error)]
pub enum VoteError {
    #[error("Post not found.")]
    PostNotFound(i64),

    #[error("Comment not found.")]
    CommentNotFound(i64),

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<VoteError> for AppError {
    fn from(err: VoteError) -> Self {
        match err {
            VoteError::PostNotFound(_) | VoteError::CommentNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            VoteError::Repository(e) => e,
        }
    }
}

/// VoteService implementation
pub struct VoteServiceImpl {
    vote_repo: Arc<dyn VoteRepository>,
    post_repo: Arc<dyn PostRepository>,
    comment_repo: Arc<dyn CommentRepository>,
}

impl VoteServiceImpl {
    pub fn new(
        vote_repo: Arc<dyn VoteRepository>,
        post_repo: Arc<dyn PostRepository>,
        comment_repo: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            vote_repo,
            post_repo,
            comment_repo,
        }
    }

    /// Post the target lives on; fails when the target does not exist.
    async fn resolve_post(&self, target: VoteTarget) -> Result<i64, VoteError> {
        match target {
            VoteTarget::Post(id) => self
                .post_repo
                .find_by_id(id)
                .await?
                .map(|post| post.id)
                .ok_or(VoteError::PostNotFound(id)),
            VoteTarget::Comment(id) => self
                .comment_repo
                .find_by_id(id)
                .await?
                .map(|comment| comment.post_id)
                .ok_or(VoteError::CommentNotFound(id)),
        }
    }

    async fn outcome(&self, target: VoteTarget, post_id: i64) -> Result<VoteOutcome, VoteError> {
        Ok(VoteOutcome {
            target,
            post_id,
            score: self.score(target).await?,
        })
    }
}

#[async_trait]
impl VoteService for VoteServiceImpl {
    async fn vote(
        &self,
        user_id: i64,
        target: VoteTarget,
        liked: bool,
    ) -> Result<VoteOutcome, VoteError> {
        let post_id = self.resolve_post(target).await?;

        match self.vote_repo.upsert(user_id, target, liked).await {
            Ok(_) => {}
            // Target deleted between lookup and insert
            Err(AppError::NotFound(_)) => {
                return Err(match target {
                    VoteTarget::Post(id) => VoteError::PostNotFound(id),
                    VoteTarget::Comment(id) => VoteError::CommentNotFound(id),
                })
            }
            Err(e) => return Err(e.into()),
        }

        record_forum_action(ForumAction::VoteCast);
        tracing::info!(user_id, %target, liked, "Vote cast");
        self.outcome(target, post_id).await
    }

    async fn withdraw_vote(
        &self,
        user_id: i64,
        target: VoteTarget,
    ) -> Result<VoteOutcome, VoteError> {
        let post_id = self.resolve_post(target).await?;

        if self.vote_repo.delete(user_id, target).await? {
            record_forum_action(ForumAction::VoteWithdrawn);
            tracing::info!(user_id, %target, "Vote withdrawn");
        }

        self.outcome(target, post_id).await
    }

    async fn score(&self, target: VoteTarget) -> Result<i64, VoteError> {
        Ok(self.vote_repo.tally(target).await?.score())
    }
}
