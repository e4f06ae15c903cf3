//! Authentication Middleware
//!
//! Bearer-token validation for protected and optionally-authenticated
//! routes. Every authenticated request refreshes the user's `last_seen`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::application::services::AuthService;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Authenticated user extension
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
}

/// Resolve the bearer token on a request to a known user.
async fn authenticate(state: &AppState, token: &str) -> Result<AuthUser, AppError> {
    let user = state.services.auth.get_current_user(token).await?;

    state.repos.users.touch_last_seen(user.id).await?;

    Ok(AuthUser {
        user_id: user.id,
        username: user.username,
    })
}

/// Authentication middleware that rejects requests without a valid token
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Authorization(bearer) = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    let user = authenticate(&state, bearer.token()).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Optional authentication middleware (doesn't fail if no token)
///
/// A token that fails validation is ignored and the request continues
/// anonymously.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>() {
        match authenticate(&state, bearer.token()).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring invalid bearer token"),
        }
    }

    next.run(request).await
}
