//! Subscription Repository Implementation
//!
//! Backed by the `subs` table; the (user_id, chat_id) primary key makes
//! subscribing idempotent.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Chat, SubscriptionRepository};
use crate::infrastructure::database::not_found_on_foreign_key;
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct SubscribedChatRow {
    id: i64,
    name: String,
    about: String,
    creator_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// PostgreSQL subscription repository implementation.
#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn exists(&self, user_id: i64, chat_id: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM subs WHERE user_id = $1 AND chat_id = $2)",
        )
        .bind(user_id)
        .bind(chat_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Returns `false` when the user was already subscribed.
    async fn insert(&self, user_id: i64, chat_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT INTO subs (user_id, chat_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(chat_id)
        .execute(&self.pool)
        .await
        .map_err(|e| not_found_on_foreign_key(e, "Chat not found"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, user_id: i64, chat_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM subs WHERE user_id = $1 AND chat_id = $2")
            .bind(user_id)
            .bind(chat_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_for_chat(&self, chat_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subs WHERE chat_id = $1")
            .bind(chat_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn chats_for_user(&self, user_id: i64) -> Result<Vec<Chat>, AppError> {
        let rows = sqlx::query_as::<_, SubscribedChatRow>(
            r#"
            SELECT c.id, c.name, c.about, c.creator_id, c.created_at, c.updated_at
            FROM chats c
            JOIN subs s ON s.chat_id = c.id
            WHERE s.user_id = $1
            ORDER BY c.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Chat {
                id: r.id,
                name: r.name,
                about: r.about,
                creator_id: r.creator_id,
                created_at: r.created_at,
                updated_at: r.updated_at,
            })
            .collect())
    }
}
