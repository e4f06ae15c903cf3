//! Request DTOs
//!
//! Form and JSON bodies accepted by the handlers. Length limits mirror the
//! column sizes in the schema.

use serde::Deserialize;
use validator::Validate;

use crate::shared::validation::{validate_required, validate_required_name};

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        custom(function = validate_required_name),
        length(max = 64, message = "Username must be at most 64 characters")
    )]
    pub username: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 300, message = "Email must be at most 300 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = validate_required))]
    pub username: String,

    #[validate(custom(function = validate_required))]
    pub password: String,
}

/// Query string shared by the paginated listings.
///
/// `page` stays a string so that garbage falls back to the first page
/// instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn search_term(&self) -> Option<&str> {
        normalize_search(self.search.as_deref())
    }
}

/// Search form posted to the searchable listings.
#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search: Option<String>,
}

impl SearchForm {
    pub fn search_term(&self) -> Option<&str> {
        normalize_search(self.search.as_deref())
    }
}

/// Trimmed search term, or `None` when there is nothing to match.
pub fn normalize_search(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// New chat form
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChatRequest {
    #[validate(
        custom(function = validate_required_name),
        length(max = 300, message = "Name must be at most 300 characters")
    )]
    pub name: String,

    #[validate(
        custom(function = validate_required),
        length(max = 4000, message = "Description must be at most 4000 characters")
    )]
    pub about: String,
}

/// Chat description edit form
#[derive(Debug, Deserialize, Validate)]
pub struct EditChatRequest {
    #[serde(default)]
    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub about: String,
}

/// Profile edit form
#[derive(Debug, Deserialize, Validate)]
pub struct EditProfileRequest {
    #[validate(length(max = 300, message = "About me must be at most 300 characters"))]
    pub about_me: Option<String>,
}

/// New comment form
#[derive(Debug, Deserialize, Validate)]
pub struct NewCommentRequest {
    #[validate(
        custom(function = validate_required),
        length(max = 4000, message = "Comment must be at most 4000 characters")
    )]
    pub body: String,

    /// Comment being replied to
    pub parent_id: Option<i64>,
}

/// Text fields of the multipart new-post form.
#[derive(Debug, Default, Validate)]
pub struct NewPostRequest {
    #[validate(length(min = 1, message = "Please select a chat"))]
    pub chat_name: String,

    #[validate(
        custom(function = validate_required),
        length(max = 300, message = "Title must be at most 300 characters")
    )]
    pub title: String,

    #[validate(length(max = 4000, message = "Body must be at most 4000 characters"))]
    pub body: String,
}
