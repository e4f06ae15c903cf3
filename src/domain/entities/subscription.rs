//! Subscription entity and repository trait.
//!
//! Maps to the `subs` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chat::Chat;
use crate::shared::error::AppError;

/// A user's membership in a chat.
///
/// Maps to the `subs` table:
/// - user_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE (composite PK)
/// - chat_id: BIGINT NOT NULL REFERENCES chats(id) ON DELETE CASCADE (composite PK)
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub user_id: i64,
    pub chat_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Repository trait for Subscription data access operations.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Check if the user subscribes to the chat.
    async fn exists(&self, user_id: i64, chat_id: i64) -> Result<bool, AppError>;

    /// Subscribe. Idempotent; returns whether a row was added.
    async fn insert(&self, user_id: i64, chat_id: i64) -> Result<bool, AppError>;

    /// Unsubscribe. Returns whether a row was removed.
    async fn delete(&self, user_id: i64, chat_id: i64) -> Result<bool, AppError>;

    /// Number of subscribers of a chat.
    async fn count_for_chat(&self, chat_id: i64) -> Result<i64, AppError>;

    /// Chats the user subscribes to, alphabetically.
    async fn chats_for_user(&self, user_id: i64) -> Result<Vec<Chat>, AppError>;
}
