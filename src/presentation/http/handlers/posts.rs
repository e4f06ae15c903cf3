//! Post Handlers
//!
//! Post pages with comments, multipart post creation and deletion.

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use validator::Validate;

use crate::application::dto::request::{ListQuery, NewCommentRequest, NewPostRequest};
use crate::application::dto::response::{
    FlashResponse, MakePostFormResponse, PageResponse, PostPageResponse,
};
use crate::application::services::{MakePost, UploadedImage};
use crate::domain::PageRequest;
use crate::presentation::http::extractors::{
    body_rejection, CurrentUser, EntityId, FormOrJson, MaybeUser, Referer,
};
use crate::presentation::http::paths;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Post details and its comments, newest first
pub async fn show_post(
    State(state): State<AppState>,
    viewer: MaybeUser,
    EntityId(post_id): EntityId,
    Query(query): Query<ListQuery>,
) -> Result<Json<PostPageResponse>, AppError> {
    let page = PageRequest::from_query(
        query.page.as_deref(),
        state.settings.pagination.comments_per_page,
    );
    let post_page = state.services.posts.post_page(post_id, viewer.id(), page).await?;

    Ok(Json(PostPageResponse {
        post: post_page.post,
        can_delete: post_page.can_delete,
        comments: PageResponse::new(post_page.comments, &paths::post(post_id)),
    }))
}

/// Comment on a post, signed in or not
pub async fn add_comment(
    State(state): State<AppState>,
    viewer: MaybeUser,
    EntityId(post_id): EntityId,
    form: Result<FormOrJson<NewCommentRequest>, AppError>,
) -> Result<Json<FlashResponse>, AppError> {
    // an unknown post is a 404 whatever was submitted
    state.services.posts.get(post_id).await?;
    let body = form?.validated()?;

    state
        .services
        .posts
        .add_comment(post_id, viewer.id(), &body.body, body.parent_id)
        .await?;

    Ok(Json(FlashResponse::new(
        "Your comment is now live!",
        paths::post(post_id),
    )))
}

pub async fn make_post_form(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    chat_name: Option<Path<String>>,
) -> Result<Json<MakePostFormResponse>, AppError> {
    Ok(Json(MakePostFormResponse {
        chat_name: chat_name.map(|Path(name)| name),
        chats: state.services.chats.names().await?,
    }))
}

/// Create a post from a multipart form with an optional `image` file
pub async fn make_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    chat_name: Option<Path<String>>,
    multipart: Multipart,
) -> Result<Json<FlashResponse>, AppError> {
    let (form, image) = read_post_form(multipart).await?;

    let mut form = form;
    if form.chat_name.trim().is_empty() {
        if let Some(Path(name)) = chat_name {
            form.chat_name = name;
        }
    }
    form.validate().map_err(validation_error)?;

    let (_, chat) = state
        .services
        .posts
        .make_post(
            user.user_id,
            MakePost {
                chat_name: form.chat_name.trim().to_string(),
                title: form.title.trim().to_string(),
                body: form.body,
                image,
            },
        )
        .await?;

    Ok(Json(FlashResponse::new(
        "Your new post is now live!",
        paths::chat(&chat.name),
    )))
}

/// Split a multipart body into the text fields and the image part.
///
/// A file part with no filename or no bytes counts as no image.
async fn read_post_form(
    mut multipart: Multipart,
) -> Result<(NewPostRequest, Option<UploadedImage>), AppError> {
    let mut form = NewPostRequest::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| body_rejection(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| body_rejection(e.status(), e.body_text()))?;
                if !filename.is_empty() && !bytes.is_empty() {
                    image = Some(UploadedImage {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "chat_name" | "title" | "body" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| body_rejection(e.status(), e.body_text()))?;
                match name.as_str() {
                    "chat_name" => form.chat_name = value,
                    "title" => form.title = value,
                    _ => form.body = value,
                }
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok((form, image))
}

/// Delete a post as its author or its chat's creator
pub async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    referer: Referer,
    EntityId(post_id): EntityId,
) -> Result<Json<FlashResponse>, AppError> {
    let chat = state.services.posts.delete(user.user_id, post_id).await?;

    Ok(Json(FlashResponse::new(
        "You deleted the post.",
        referer.or(paths::chat(&chat.name)),
    )))
}
