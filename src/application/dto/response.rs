//! Response DTOs
//!
//! Data structures for API response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Page;

/// Outcome of a mutation: a user-facing message and where to go next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashResponse {
    pub message: String,
    pub redirect: String,
}

impl FlashResponse {
    pub fn new(message: impl Into<String>, redirect: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            redirect: redirect.into(),
        }
    }
}

/// One page of a listing with links to its neighbours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub next_url: Option<String>,
    pub prev_url: Option<String>,
}

impl<T> PageResponse<T> {
    /// Attach `?page=N` links for `path` to a page.
    pub fn new(page: Page<T>, path: &str) -> Self {
        let link = |n: u32| format!("{}?page={}", path, n);
        Self {
            next_url: page.next_page().map(link),
            prev_url: page.prev_page().map(link),
            page: page.page,
            per_page: page.per_page,
            items: page.items,
        }
    }
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub about_me: Option<String>,
    pub avatar_url: String,
    pub score: i64,
    pub last_seen: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A user's own account, including the email address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountView {
    #[serde(flatten)]
    pub user: UserView,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatView {
    pub id: i64,
    pub name: String,
    pub about: String,
    pub creator_id: Option<i64>,
    pub subscriber_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageView {
    pub filename: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author_id: Option<i64>,
    /// Username of the author, absent once the account is gone
    pub author: Option<String>,
    pub chat_id: i64,
    pub chat: String,
    pub image: Option<ImageView>,
    pub score: i64,
    pub upvotes: i64,
    pub downvotes: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i64,
    pub body: String,
    pub author_id: Option<i64>,
    pub author: Option<String>,
    pub post_id: i64,
    pub parent_id: Option<i64>,
    pub score: i64,
    pub upvotes: i64,
    pub downvotes: i64,
    pub created_at: DateTime<Utc>,
}

/// Bearer token issued at login or registration
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: AccountView,
}

/// Landing page
#[derive(Debug, Serialize, Deserialize)]
pub struct HomeResponse {
    pub title: String,
    pub user: Option<UserView>,
    /// Names of the chats the viewer subscribes to
    #[serde(default)]
    pub subscriptions: Vec<String>,
}

/// User profile with their posts
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserView,
    pub posts: PageResponse<PostView>,
}

/// Chat page with its posts
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatPageResponse {
    pub chat: ChatView,
    /// Whether the caller subscribes; absent for anonymous callers
    pub subscribed: Option<bool>,
    pub can_edit: bool,
    pub posts: PageResponse<PostView>,
}

/// Post page with its comments
#[derive(Debug, Serialize, Deserialize)]
pub struct PostPageResponse {
    pub post: PostView,
    pub can_delete: bool,
    pub comments: PageResponse<CommentView>,
}

/// Current values for the new-post form
#[derive(Debug, Serialize, Deserialize)]
pub struct MakePostFormResponse {
    pub chat_name: Option<String>,
    pub chats: Vec<String>,
}

/// Current values for the chat edit form
#[derive(Debug, Serialize, Deserialize)]
pub struct EditChatFormResponse {
    pub name: String,
    pub about: String,
}

/// Current values for the profile edit form
#[derive(Debug, Serialize, Deserialize)]
pub struct EditProfileFormResponse {
    pub about_me: Option<String>,
}
