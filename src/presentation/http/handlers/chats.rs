//! Chat Handlers
//!
//! Chat pages, creation, description edits and subscriptions.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::application::dto::request::{CreateChatRequest, EditChatRequest, ListQuery};
use crate::application::dto::response::{
    ChatPageResponse, EditChatFormResponse, FlashResponse, PageResponse,
};
use crate::domain::PageRequest;
use crate::presentation::http::extractors::{CurrentUser, FormOrJson, MaybeUser, Referer, ValidForm};
use crate::presentation::http::paths;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Chat details and its posts, newest first
pub async fn show_chat(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(name): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ChatPageResponse>, AppError> {
    let page = PageRequest::from_query(
        query.page.as_deref(),
        state.settings.pagination.posts_per_page,
    );
    let chat_page = state.services.chats.chat_page(&name, viewer.id(), page).await?;
    let path = paths::chat(&chat_page.chat.name);

    Ok(Json(ChatPageResponse {
        chat: chat_page.chat,
        subscribed: chat_page.subscribed,
        can_edit: chat_page.can_edit,
        posts: PageResponse::new(chat_page.posts, &path),
    }))
}

pub async fn create_chat_form(CurrentUser(_): CurrentUser) -> Json<EditChatFormResponse> {
    Json(EditChatFormResponse {
        name: String::new(),
        about: String::new(),
    })
}

/// Create a chat; the creator is subscribed to it
pub async fn create_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidForm(body): ValidForm<CreateChatRequest>,
) -> Result<Json<FlashResponse>, AppError> {
    let chat = state
        .services
        .chats
        .create(user.user_id, &body.name, &body.about)
        .await?;

    Ok(Json(FlashResponse::new(
        "Your new chat is now live!",
        paths::chat(&chat.name),
    )))
}

pub async fn edit_chat_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(name): Path<String>,
) -> Result<Json<EditChatFormResponse>, AppError> {
    let chat = state.services.chats.editable(user.user_id, &name).await?;

    Ok(Json(EditChatFormResponse {
        name: chat.name,
        about: chat.about,
    }))
}

pub async fn edit_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(name): Path<String>,
    form: Result<FormOrJson<EditChatRequest>, AppError>,
) -> Result<Json<FlashResponse>, AppError> {
    state.services.chats.editable(user.user_id, &name).await?;
    let body = form?.validated()?;

    let chat = state
        .services
        .chats
        .edit(user.user_id, &name, &body.about)
        .await?;

    Ok(Json(FlashResponse::new(
        "Your changes have been saved.",
        paths::chat(&chat.name),
    )))
}

pub async fn subscribe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    referer: Referer,
    Path(name): Path<String>,
) -> Result<Json<FlashResponse>, AppError> {
    let chat = state
        .services
        .subscriptions
        .subscribe(user.user_id, &name)
        .await?;

    Ok(Json(FlashResponse::new(
        format!("You subscribed to chat/{}!", chat.name),
        referer.or(paths::chat(&chat.name)),
    )))
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    referer: Referer,
    Path(name): Path<String>,
) -> Result<Json<FlashResponse>, AppError> {
    let chat = state
        .services
        .subscriptions
        .unsubscribe(user.user_id, &name)
        .await?;

    Ok(Json(FlashResponse::new(
        format!("You unsubscribed from chat/{}!", chat.name),
        referer.or(paths::chat(&chat.name)),
    )))
}
