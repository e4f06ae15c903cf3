//! Front Page Handlers
//!
//! Home, personal feed and the three searchable listings. Each listing
//! answers `GET` with an optional `?search=` and `POST` with a `search`
//! form field.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::application::dto::request::ListQuery;
use crate::application::dto::response::{
    ChatView, HomeResponse, PageResponse, PostView, UserView,
};
use crate::domain::PageRequest;
use crate::presentation::http::extractors::{CurrentUser, MaybeUser, SearchBody};
use crate::shared::error::AppError;
use crate::startup::AppState;

pub async fn index(
    State(state): State<AppState>,
    viewer: MaybeUser,
) -> Result<Json<HomeResponse>, AppError> {
    let Some(auth) = viewer.0 else {
        return Ok(Json(HomeResponse {
            title: "Home".into(),
            user: None,
            subscriptions: Vec::new(),
        }));
    };

    let user = state.services.users.get_by_username(&auth.username).await?;
    let subscriptions = state
        .services
        .subscriptions
        .subscriptions(auth.user_id)
        .await?
        .into_iter()
        .map(|chat| chat.name)
        .collect();

    Ok(Json(HomeResponse {
        title: "Home".into(),
        user: Some(state.services.views.user(&user).await?),
        subscriptions,
    }))
}

/// Posts from every chat the user subscribes to
pub async fn feed(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<PageResponse<PostView>>, AppError> {
    let page = PageRequest::from_query(
        query.page.as_deref(),
        state.settings.pagination.posts_per_page,
    );
    let posts = state
        .services
        .subscriptions
        .subscribed_posts(user.user_id, page)
        .await?;

    Ok(Json(PageResponse::new(posts, "/feed")))
}

pub async fn popular(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PageResponse<PostView>>, AppError> {
    list_popular(&state, &query, query.search_term()).await
}

pub async fn search_popular(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    SearchBody(form): SearchBody,
) -> Result<Json<PageResponse<PostView>>, AppError> {
    list_popular(&state, &query, form.search_term()).await
}

async fn list_popular(
    state: &AppState,
    query: &ListQuery,
    search: Option<&str>,
) -> Result<Json<PageResponse<PostView>>, AppError> {
    let page = PageRequest::from_query(
        query.page.as_deref(),
        state.settings.pagination.posts_per_page,
    );
    let posts = state.services.posts.popular(search, page).await?;

    Ok(Json(PageResponse::new(posts, "/popular")))
}

pub async fn explore_chats(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PageResponse<ChatView>>, AppError> {
    list_chats(&state, &query, query.search_term()).await
}

pub async fn search_chats(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    SearchBody(form): SearchBody,
) -> Result<Json<PageResponse<ChatView>>, AppError> {
    list_chats(&state, &query, form.search_term()).await
}

async fn list_chats(
    state: &AppState,
    query: &ListQuery,
    search: Option<&str>,
) -> Result<Json<PageResponse<ChatView>>, AppError> {
    let page = PageRequest::from_query(
        query.page.as_deref(),
        state.settings.pagination.chats_per_page,
    );
    let chats = state.services.chats.explore(search, page).await?;

    Ok(Json(PageResponse::new(chats, "/explore_chats")))
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PageResponse<UserView>>, AppError> {
    list_leaders(&state, &query, query.search_term()).await
}

pub async fn search_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    SearchBody(form): SearchBody,
) -> Result<Json<PageResponse<UserView>>, AppError> {
    list_leaders(&state, &query, form.search_term()).await
}

async fn list_leaders(
    state: &AppState,
    query: &ListQuery,
    search: Option<&str>,
) -> Result<Json<PageResponse<UserView>>, AppError> {
    let page = PageRequest::from_query(
        query.page.as_deref(),
        state.settings.pagination.users_per_page,
    );
    let users = state.services.users.leaderboard(search, page).await?;

    Ok(Json(PageResponse::new(users, "/leaderboard")))
}
