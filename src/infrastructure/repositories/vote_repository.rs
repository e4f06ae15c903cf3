//! Vote Repository Implementation
//!
//! Post and comment votes live in separate tables with the same shape; the
//! [`VoteTarget`] variant picks the table. One row per (user, target) is
//! enforced by the primary key, so casting again overwrites the polarity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Vote, VoteRepository, VoteTally, VoteTarget};
use crate::infrastructure::database::not_found_on_foreign_key;
use crate::shared::error::AppError;

/// Table and target column for a vote target.
fn vote_table(target: VoteTarget) -> (&'static str, &'static str) {
    match target {
        VoteTarget::Post(_) => ("post_votes", "post_id"),
        VoteTarget::Comment(_) => ("comment_votes", "comment_id"),
    }
}

#[derive(Debug, sqlx::FromRow)]
struct VoteRow {
    user_id: i64,
    liked: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VoteRow {
    fn into_vote(self, target: VoteTarget) -> Vote {
        Vote {
            user_id: self.user_id,
            target,
            liked: self.liked,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TallyRow {
    upvotes: i64,
    downvotes: i64,
}

/// PostgreSQL vote repository implementation.
#[derive(Clone)]
pub struct PgVoteRepository {
    pool: PgPool,
}

impl PgVoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for PgVoteRepository {
    async fn find(&self, user_id: i64, target: VoteTarget) -> Result<Option<Vote>, AppError> {
        let (table, column) = vote_table(target);
        let row = sqlx::query_as::<_, VoteRow>(&format!(
            "SELECT user_id, liked, created_at, updated_at FROM {table} \
             WHERE user_id = $1 AND {column} = $2"
        ))
        .bind(user_id)
        .bind(target.id())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_vote(target)))
    }

    async fn upsert(
        &self,
        user_id: i64,
        target: VoteTarget,
        liked: bool,
    ) -> Result<Vote, AppError> {
        let (table, column) = vote_table(target);
        let row = sqlx::query_as::<_, VoteRow>(&format!(
            r#"
            INSERT INTO {table} (user_id, {column}, liked)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, {column})
            DO UPDATE SET liked = EXCLUDED.liked, updated_at = NOW()
            RETURNING user_id, liked, created_at, updated_at
            "#
        ))
        .bind(user_id)
        .bind(target.id())
        .bind(liked)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_on_foreign_key(e, &format!("{} not found", target.kind())))?;

        Ok(row.into_vote(target))
    }

    async fn delete(&self, user_id: i64, target: VoteTarget) -> Result<bool, AppError> {
        let (table, column) = vote_table(target);
        let result = sqlx::query(&format!(
            "DELETE FROM {table} WHERE user_id = $1 AND {column} = $2"
        ))
        .bind(user_id)
        .bind(target.id())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn tally(&self, target: VoteTarget) -> Result<VoteTally, AppError> {
        let (table, column) = vote_table(target);
        let row = sqlx::query_as::<_, TallyRow>(&format!(
            r#"
            SELECT COUNT(*) FILTER (WHERE liked) AS upvotes,
                   COUNT(*) FILTER (WHERE NOT liked) AS downvotes
            FROM {table}
            WHERE {column} = $1
            "#
        ))
        .bind(target.id())
        .fetch_one(&self.pool)
        .await?;

        Ok(VoteTally::new(row.upvotes, row.downvotes))
    }
}
