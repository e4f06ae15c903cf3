//! User Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::application::dto::request::{EditProfileRequest, ListQuery};
use crate::application::dto::response::{
    EditProfileFormResponse, FlashResponse, PageResponse, ProfileResponse,
};
use crate::domain::PageRequest;
use crate::presentation::http::extractors::{CurrentUser, ValidForm};
use crate::presentation::http::paths;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Profile and the user's posts, newest first
pub async fn show_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProfileResponse>, AppError> {
    let page = PageRequest::from_query(
        query.page.as_deref(),
        state.settings.pagination.posts_per_page,
    );
    let (user, posts) = state.services.users.profile(&username, page).await?;
    let path = paths::user(&user.username);

    Ok(Json(ProfileResponse {
        user,
        posts: PageResponse::new(posts, &path),
    }))
}

pub async fn edit_profile_form(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<EditProfileFormResponse>, AppError> {
    let user = state.services.users.get_by_username(&auth.username).await?;

    Ok(Json(EditProfileFormResponse {
        about_me: user.about_me,
    }))
}

pub async fn edit_profile(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    ValidForm(body): ValidForm<EditProfileRequest>,
) -> Result<Json<FlashResponse>, AppError> {
    let user = state
        .services
        .users
        .update_about_me(auth.user_id, body.about_me.as_deref())
        .await?;

    Ok(Json(FlashResponse::new(
        "Your changes have been saved.",
        paths::user(&user.username),
    )))
}
