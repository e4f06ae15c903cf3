//! Route Configuration
//!
//! Configures all HTTP routes for the forum API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use super::handlers;
use crate::presentation::middleware::{
    auth_middleware, create_cors_layer, create_security_headers_layer, create_trace_layer,
    optional_auth_middleware, track_metrics,
};
use crate::startup::AppState;

/// Create the main router with every middleware layer applied
pub fn create_router(state: AppState) -> Router {
    let settings = state.settings.clone();

    Router::new()
        .merge(public_routes())
        .merge(viewer_routes(state.clone()))
        .merge(member_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(handlers::health::metrics_handler))
        // Uploaded post images
        .nest_service(
            &settings.uploads.url_prefix,
            ServeDir::new(&settings.uploads.directory),
        )
        .layer(DefaultBodyLimit::max(settings.uploads.max_size_bytes))
        .layer(middleware::from_fn(track_metrics))
        .layer(create_trace_layer())
        .layer(create_cors_layer(&settings.cors))
        // Outermost so every response gets the headers
        .layer(create_security_headers_layer(settings.is_production()))
        .with_state(state)
}

/// Routes that never look at the caller
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/popular",
            get(handlers::front::popular).post(handlers::front::search_popular),
        )
        .route(
            "/explore_chats",
            get(handlers::front::explore_chats).post(handlers::front::search_chats),
        )
        .route(
            "/leaderboard",
            get(handlers::front::leaderboard).post(handlers::front::search_leaderboard),
        )
        .route("/user/{username}", get(handlers::users::show_user))
}

/// Routes that adapt to a signed-in caller but allow anonymous ones
fn viewer_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::front::index))
        .route("/index", get(handlers::front::index))
        .route(
            "/chat/{name}",
            get(handlers::chats::show_chat).post(handlers::chats::show_chat),
        )
        .route(
            "/post/{post_id}",
            get(handlers::posts::show_post).post(handlers::posts::add_comment),
        )
        .route_layer(middleware::from_fn_with_state(state, optional_auth_middleware))
}

/// Routes that require a valid bearer token
fn member_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/feed", get(handlers::front::feed))
        .route(
            "/edit_profile",
            get(handlers::users::edit_profile_form).post(handlers::users::edit_profile),
        )
        .route(
            "/create_chat",
            get(handlers::chats::create_chat_form).post(handlers::chats::create_chat),
        )
        .route(
            "/edit_chat/{name}",
            get(handlers::chats::edit_chat_form).post(handlers::chats::edit_chat),
        )
        .route("/subscribe/{name}", get(handlers::chats::subscribe))
        .route("/unsubscribe/{name}", get(handlers::chats::unsubscribe))
        .route(
            "/make_post",
            get(handlers::posts::make_post_form).post(handlers::posts::make_post),
        )
        .route(
            "/make_post/{chat_name}",
            get(handlers::posts::make_post_form).post(handlers::posts::make_post),
        )
        .route("/delete_post/{post_id}", post(handlers::posts::delete_post))
        .route("/upvote/{post_id}", get(handlers::votes::upvote))
        .route("/downvote/{post_id}", get(handlers::votes::downvote))
        .route("/withdraw_vote/{post_id}", get(handlers::votes::withdraw_vote))
        .route("/upvote_comment/{comment_id}", get(handlers::votes::upvote_comment))
        .route("/downvote_comment/{comment_id}", get(handlers::votes::downvote_comment))
        .route(
            "/withdraw_vote_comment/{comment_id}",
            get(handlers::votes::withdraw_vote_comment),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
