//! Authentication Handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::application::dto::request::{LoginRequest, RegisterRequest};
use crate::application::dto::response::TokenResponse;
use crate::application::services::{AuthService, AuthTokens};
use crate::domain::User;
use crate::presentation::http::extractors::ValidForm;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    ValidForm(body): ValidForm<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let (user, tokens) = state
        .services
        .auth
        .register(body.username.trim(), body.email.trim(), &body.password)
        .await?;

    let response = token_response(&state, &user, tokens).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with username and password
pub async fn login(
    State(state): State<AppState>,
    ValidForm(body): ValidForm<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let (user, tokens) = state
        .services
        .auth
        .authenticate(body.username.trim(), &body.password)
        .await?;

    Ok(Json(token_response(&state, &user, tokens).await?))
}

async fn token_response(
    state: &AppState,
    user: &User,
    tokens: AuthTokens,
) -> Result<TokenResponse, AppError> {
    Ok(TokenResponse {
        access_token: tokens.access_token,
        token_type: tokens.token_type,
        expires_in: tokens.expires_in,
        user: state.services.views.account(user).await?,
    })
}
