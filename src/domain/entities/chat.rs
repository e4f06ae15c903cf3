//! Chat entity and repository trait.
//!
//! Maps to the `chats` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PageRequest;
use crate::shared::error::AppError;

/// A named community room that holds posts.
///
/// Maps to the `chats` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - name: VARCHAR(300) NOT NULL (unique on LOWER(name))
/// - about: VARCHAR(4000) NOT NULL
/// - creator_id: BIGINT NULL REFERENCES users(id) ON DELETE SET NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,

    /// Display name; lookups ignore case
    pub name: String,

    /// Description shown on the chat page
    pub about: String,

    /// User who created the chat
    pub creator_id: Option<i64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub const NAME_MAX_LEN: usize = 300;
    pub const ABOUT_MAX_LEN: usize = 4000;

    /// Check if a user created this chat.
    pub fn is_creator(&self, user_id: i64) -> bool {
        self.creator_id == Some(user_id)
    }
}

impl Default for Chat {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: String::new(),
            about: String::new(),
            creator_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields required to insert a chat.
#[derive(Debug, Clone)]
pub struct NewChat {
    pub name: String,
    pub about: String,
    pub creator_id: i64,
}

/// A chat together with how many users subscribe to it.
#[derive(Debug, Clone)]
pub struct ChatWithSubscribers {
    pub chat: Chat,
    pub subscriber_count: i64,
}

/// Repository trait for Chat data access operations.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Find a chat by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Chat>, AppError>;

    /// Find a chat by name, ignoring case.
    async fn find_by_name(&self, name: &str) -> Result<Option<Chat>, AppError>;

    /// Insert a chat and subscribe its creator to it atomically.
    ///
    /// A name that collides ignoring case is a `Conflict`.
    async fn create(&self, chat: &NewChat) -> Result<Chat, AppError>;

    /// Replace the chat description.
    async fn update_about(&self, id: i64, about: &str) -> Result<Chat, AppError>;

    /// Names of all chats, alphabetically.
    async fn list_names(&self) -> Result<Vec<String>, AppError>;

    /// Chats ordered by subscriber count, most first, optionally filtered by
    /// a substring of the name or description. Returns up to
    /// `page.fetch_limit()` rows.
    async fn explore(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<ChatWithSubscribers>, AppError>;
}
