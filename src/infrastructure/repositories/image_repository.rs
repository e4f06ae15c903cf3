//! Image Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Image, ImageRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ImageRow {
    id: i64,
    post_id: Option<i64>,
    filename: String,
    url: String,
    created_at: DateTime<Utc>,
}

impl ImageRow {
    pub(crate) fn into_image(self) -> Image {
        Image {
            id: self.id,
            post_id: self.post_id,
            filename: self.filename,
            url: self.url,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL image repository implementation.
#[derive(Clone)]
pub struct PgImageRepository {
    pool: PgPool,
}

impl PgImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for PgImageRepository {
    async fn find_by_post(&self, post_id: i64) -> Result<Option<Image>, AppError> {
        let row = sqlx::query_as::<_, ImageRow>(
            "SELECT id, post_id, filename, url, created_at FROM images WHERE post_id = $1",
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ImageRow::into_image))
    }
}
