//! Vote Handlers
//!
//! Up/down votes and withdrawals on posts and comments. Every response
//! carries the new score next to the flash message.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::application::dto::response::FlashResponse;
use crate::application::services::VoteOutcome;
use crate::domain::VoteTarget;
use crate::presentation::http::extractors::{CurrentUser, EntityId, Referer};
use crate::presentation::http::paths;
use crate::shared::error::AppError;
use crate::startup::AppState;

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    #[serde(flatten)]
    pub flash: FlashResponse,
    pub vote: VoteOutcome,
}

#[derive(Debug, Clone, Copy)]
enum VoteAction {
    Up,
    Down,
    Withdraw,
}

async fn apply(
    state: &AppState,
    user_id: i64,
    target: VoteTarget,
    action: VoteAction,
    referer: Referer,
) -> Result<Json<VoteResponse>, AppError> {
    let votes = &state.services.votes;
    let outcome = match action {
        VoteAction::Up => votes.upvote(user_id, target).await?,
        VoteAction::Down => votes.downvote(user_id, target).await?,
        VoteAction::Withdraw => votes.withdraw_vote(user_id, target).await?,
    };

    let message = match (target, action) {
        (_, VoteAction::Withdraw) => "You withdrew your vote.",
        (VoteTarget::Post(_), VoteAction::Up) => "You upvoted the post!",
        (VoteTarget::Post(_), VoteAction::Down) => "You downvoted the post!",
        (VoteTarget::Comment(_), _) => "You voted on the comment!",
    };

    Ok(Json(VoteResponse {
        flash: FlashResponse::new(message, referer.or(paths::post(outcome.post_id))),
        vote: outcome,
    }))
}

pub async fn upvote(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    referer: Referer,
    EntityId(post_id): EntityId,
) -> Result<Json<VoteResponse>, AppError> {
    apply(&state, user.user_id, VoteTarget::Post(post_id), VoteAction::Up, referer).await
}

pub async fn downvote(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    referer: Referer,
    EntityId(post_id): EntityId,
) -> Result<Json<VoteResponse>, AppError> {
    apply(&state, user.user_id, VoteTarget::Post(post_id), VoteAction::Down, referer).await
}

pub async fn withdraw_vote(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    referer: Referer,
    EntityId(post_id): EntityId,
) -> Result<Json<VoteResponse>, AppError> {
    apply(&state, user.user_id, VoteTarget::Post(post_id), VoteAction::Withdraw, referer).await
}

pub async fn upvote_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    referer: Referer,
    EntityId(comment_id): EntityId,
) -> Result<Json<VoteResponse>, AppError> {
    apply(&state, user.user_id, VoteTarget::Comment(comment_id), VoteAction::Up, referer).await
}

pub async fn downvote_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    referer: Referer,
    EntityId(comment_id): EntityId,
) -> Result<Json<VoteResponse>, AppError> {
    apply(&state, user.user_id, VoteTarget::Comment(comment_id), VoteAction::Down, referer).await
}

pub async fn withdraw_vote_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    referer: Referer,
    EntityId(comment_id): EntityId,
) -> Result<Json<VoteResponse>, AppError> {
    apply(
        &state,
        user.user_id,
        VoteTarget::Comment(comment_id),
        VoteAction::Withdraw,
        referer,
    )
    .await
}
