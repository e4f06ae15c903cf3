//! Chat Repository Implementation
//!
//! Chat names are unique without regard to case; lookups by name use the
//! `LOWER(name)` index.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Chat, ChatRepository, ChatWithSubscribers, NewChat, PageRequest};
use crate::infrastructure::database::{conflict_on_unique, execute_in_transaction};
use crate::shared::error::AppError;

const CHAT_TAKEN: &str = "That chat name is already taken.";

#[derive(Debug, sqlx::FromRow)]
struct ChatRow {
    id: i64,
    name: String,
    about: String,
    creator_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChatRow {
    fn into_chat(self) -> Chat {
        Chat {
            id: self.id,
            name: self.name,
            about: self.about,
            creator_id: self.creator_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ChatSubscribersRow {
    #[sqlx(flatten)]
    chat: ChatRow,
    subscriber_count: i64,
}

/// PostgreSQL chat repository implementation.
#[derive(Clone)]
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Chat>, AppError> {
        let row = sqlx::query_as::<_, ChatRow>(
            r#"
            SELECT id, name, about, creator_id, created_at, updated_at
            FROM chats
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ChatRow::into_chat))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Chat>, AppError> {
        let row = sqlx::query_as::<_, ChatRow>(
            r#"
            SELECT id, name, about, creator_id, created_at, updated_at
            FROM chats
            WHERE LOWER(name) = LOWER($1)
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ChatRow::into_chat))
    }

    /// Insert the chat and subscribe its creator in one transaction.
    async fn create(&self, chat: &NewChat) -> Result<Chat, AppError> {
        let new_chat = chat.clone();

        let row = execute_in_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let row = sqlx::query_as::<_, ChatRow>(
                    r#"
                    INSERT INTO chats (name, about, creator_id)
                    VALUES ($1, $2, $3)
                    RETURNING id, name, about, creator_id, created_at, updated_at
                    "#,
                )
                .bind(&new_chat.name)
                .bind(&new_chat.about)
                .bind(new_chat.creator_id)
                .fetch_one(&mut **tx)
                .await
                .map_err(|e| conflict_on_unique(e, CHAT_TAKEN))?;

                sqlx::query(
                    "INSERT INTO subs (user_id, chat_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
                )
                .bind(new_chat.creator_id)
                .bind(row.id)
                .execute(&mut **tx)
                .await?;

                Ok::<_, AppError>(row)
            })
        })
        .await?;

        tracing::debug!(chat_id = row.id, name = %row.name, "Chat created");
        Ok(row.into_chat())
    }

    async fn update_about(&self, id: i64, about: &str) -> Result<Chat, AppError> {
        let row = sqlx::query_as::<_, ChatRow>(
            r#"
            UPDATE chats
            SET about = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, about, creator_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(about)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Chat with id {} not found", id)))?;

        Ok(row.into_chat())
    }

    async fn list_names(&self) -> Result<Vec<String>, AppError> {
        let names = sqlx::query_scalar::<_, String>("SELECT name FROM chats ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(names)
    }

    async fn explore(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<ChatWithSubscribers>, AppError> {
        let rows = sqlx::query_as::<_, ChatSubscribersRow>(
            r#"
            SELECT c.id, c.name, c.about, c.creator_id, c.created_at, c.updated_at,
                   (SELECT COUNT(*) FROM subs s WHERE s.chat_id = c.id) AS subscriber_count
            FROM chats c
            WHERE ($1::TEXT IS NULL OR strpos(c.name, $1) > 0 OR strpos(c.about, $1) > 0)
            ORDER BY subscriber_count DESC, c.id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search)
        .bind(page.fetch_limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ChatWithSubscribers {
                chat: r.chat.into_chat(),
                subscriber_count: r.subscriber_count,
            })
            .collect())
    }
}
