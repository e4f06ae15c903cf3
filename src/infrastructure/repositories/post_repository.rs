//! Post Repository Implementation
//!
//! Listings are ordered newest first unless noted; every listing fetches one
//! row beyond the page so callers can tell whether another page follows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::image_repository::ImageRow;
use crate::domain::{Image, NewImage, NewPost, PageRequest, Post, PostRepository, PostScore};
use crate::infrastructure::database::{execute_in_transaction, not_found_on_foreign_key};
use crate::shared::error::AppError;

/// Net score of a post: likes minus dislikes.
pub(crate) const POST_SCORE_SQL: &str = r#"
    COALESCE((
        SELECT SUM(CASE WHEN v.liked THEN 1 ELSE -1 END)
        FROM post_votes v
        WHERE v.post_id = p.id
    ), 0)::BIGINT
"#;

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    body: String,
    author_id: Option<i64>,
    chat_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            id: self.id,
            title: self.title,
            body: self.body,
            author_id: self.author_id,
            chat_id: self.chat_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PostScoreRow {
    #[sqlx(flatten)]
    post: PostRow,
    score: i64,
}

/// PostgreSQL post repository implementation.
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, body, author_id, chat_id, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PostRow::into_post))
    }

    /// Insert the post and, when given, its image row in one transaction.
    async fn create(&self, post: &NewPost, image: Option<&NewImage>) -> Result<Post, AppError> {
        let new_post = post.clone();
        let new_image = image.cloned();

        let row = execute_in_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let row = sqlx::query_as::<_, PostRow>(
                    r#"
                    INSERT INTO posts (title, body, author_id, chat_id)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, title, body, author_id, chat_id, created_at, updated_at
                    "#,
                )
                .bind(&new_post.title)
                .bind(&new_post.body)
                .bind(new_post.author_id)
                .bind(new_post.chat_id)
                .fetch_one(&mut **tx)
                .await
                .map_err(|e| not_found_on_foreign_key(e, "Chat not found"))?;

                if let Some(image) = new_image {
                    sqlx::query("INSERT INTO images (post_id, filename, url) VALUES ($1, $2, $3)")
                        .bind(row.id)
                        .bind(&image.filename)
                        .bind(&image.url)
                        .execute(&mut **tx)
                        .await?;
                }

                Ok::<_, AppError>(row)
            })
        })
        .await?;

        tracing::debug!(post_id = row.id, chat_id = row.chat_id, "Post created");
        Ok(row.into_post())
    }

    /// Delete the post. Comments, votes and the image row cascade; the
    /// detached image is returned so its file can be removed.
    async fn delete(&self, id: i64) -> Result<Option<Image>, AppError> {
        execute_in_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let image = sqlx::query_as::<_, ImageRow>(
                    "SELECT id, post_id, filename, url, created_at FROM images WHERE post_id = $1",
                )
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;

                let result = sqlx::query("DELETE FROM posts WHERE id = $1")
                    .bind(id)
                    .execute(&mut **tx)
                    .await?;

                if result.rows_affected() == 0 {
                    return Err(AppError::NotFound(format!("Post with id {} not found", id)));
                }

                Ok(image.map(ImageRow::into_image))
            })
        })
        .await
    }

    async fn list_by_chat(&self, chat_id: i64, page: PageRequest) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, body, author_id, chat_id, created_at, updated_at
            FROM posts
            WHERE chat_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(chat_id)
        .bind(page.fetch_limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    async fn list_by_author(
        &self,
        author_id: i64,
        page: PageRequest,
    ) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, body, author_id, chat_id, created_at, updated_at
            FROM posts
            WHERE author_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(author_id)
        .bind(page.fetch_limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    async fn list_subscribed(
        &self,
        user_id: i64,
        page: PageRequest,
    ) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT p.id, p.title, p.body, p.author_id, p.chat_id, p.created_at, p.updated_at
            FROM posts p
            JOIN subs s ON s.chat_id = p.chat_id
            WHERE s.user_id = $1
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.fetch_limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    async fn popular(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<PostScore>, AppError> {
        let rows = sqlx::query_as::<_, PostScoreRow>(&format!(
            r#"
            SELECT p.id, p.title, p.body, p.author_id, p.chat_id, p.created_at, p.updated_at,
                   {POST_SCORE_SQL} AS score
            FROM posts p
            WHERE ($1::TEXT IS NULL OR strpos(p.title, $1) > 0 OR strpos(p.body, $1) > 0)
            ORDER BY score DESC, p.created_at DESC, p.id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(search)
        .bind(page.fetch_limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| PostScore {
                post: r.post.into_post(),
                score: r.score,
            })
            .collect())
    }
}
