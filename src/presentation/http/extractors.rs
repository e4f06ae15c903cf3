//! Custom Extractors
//!
//! Axum extractors for the authenticated user, the redirect target, numeric
//! ids in the path and validated form submissions.

use std::convert::Infallible;

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts, StatusCode},
    Form, Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::application::dto::request::SearchForm;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;

/// The authenticated user; rejects with 401 when the request carries none.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Please log in to access this page.".into()))
    }
}

/// The authenticated user, if any.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn id(&self) -> Option<i64> {
        self.0.as_ref().map(|u| u.user_id)
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<AuthUser>().cloned()))
    }
}

/// The `Referer` header, used as the redirect after a mutation.
#[derive(Debug, Clone, Default)]
pub struct Referer(pub Option<String>);

impl Referer {
    /// The referring page, or `fallback` when there is none.
    pub fn or(self, fallback: impl Into<String>) -> String {
        self.0.unwrap_or_else(|| fallback.into())
    }
}

impl<S> FromRequestParts<S> for Referer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Referer(
            parts
                .headers
                .get(header::REFERER)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string),
        ))
    }
}

/// A numeric id path segment. Anything that is not an id names nothing, so
/// it is a 404 rather than a malformed request.
#[derive(Debug, Clone, Copy)]
pub struct EntityId(pub i64);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, "Unparsable id in path");
                AppError::NotFound("The requested page was not found.".into())
            })?;
        Ok(EntityId(id))
    }
}

/// A body decoded as JSON or as a url-encoded form, by content type.
#[derive(Debug, Clone)]
pub struct FormOrJson<T>(pub T);

impl<S, T> FromRequest<S> for FormOrJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| body_rejection(rejection.status(), rejection.body_text()))?;
            Ok(FormOrJson(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| body_rejection(rejection.status(), rejection.body_text()))?;
            Ok(FormOrJson(value))
        }
    }
}

impl<T: Validate> FormOrJson<T> {
    /// Run the `validator` rules, for handlers that look up their target
    /// before judging the submission.
    pub fn validated(self) -> Result<T, AppError> {
        self.0.validate().map_err(validation_error)?;
        Ok(self.0)
    }
}

/// A submitted search; a POST without any body searches for nothing.
#[derive(Debug, Default)]
pub struct SearchBody(pub SearchForm);

impl<S> FromRequest<S> for SearchBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !req.headers().contains_key(header::CONTENT_TYPE) {
            return Ok(SearchBody::default());
        }
        let FormOrJson(form) = FormOrJson::<SearchForm>::from_request(req, state).await?;
        Ok(SearchBody(form))
    }
}

/// Body over the configured limit is 413, anything else malformed is 400.
pub fn body_rejection(status: StatusCode, text: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(text)
    } else {
        AppError::BadRequest(text)
    }
}

/// A [`FormOrJson`] body that also passed its `validator` rules.
#[derive(Debug, Clone)]
pub struct ValidForm<T>(pub T);

impl<S, T> FromRequest<S> for ValidForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let form = FormOrJson::<T>::from_request(req, state).await?;
        Ok(ValidForm(form.validated()?))
    }
}
