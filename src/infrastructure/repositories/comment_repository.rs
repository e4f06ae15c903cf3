//! Comment Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Comment, CommentRepository, NewComment, PageRequest};
use crate::infrastructure::database::not_found_on_foreign_key;
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: i64,
    body: String,
    author_id: Option<i64>,
    post_id: i64,
    parent_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            id: self.id,
            body: self.body,
            author_id: self.author_id,
            post_id: self.post_id,
            parent_id: self.parent_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// PostgreSQL comment repository implementation.
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, body, author_id, post_id, parent_id, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CommentRow::into_comment))
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, AppError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (body, author_id, post_id, parent_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, body, author_id, post_id, parent_id, created_at, updated_at
            "#,
        )
        .bind(&comment.body)
        .bind(comment.author_id)
        .bind(comment.post_id)
        .bind(comment.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_on_foreign_key(e, "Post not found"))?;

        Ok(row.into_comment())
    }

    async fn list_by_post(
        &self,
        post_id: i64,
        page: PageRequest,
    ) -> Result<Vec<Comment>, AppError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, body, author_id, post_id, parent_id, created_at, updated_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(post_id)
        .bind(page.fetch_limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }

    async fn count_by_post(&self, post_id: i64) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
                .bind(post_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
