//! User Repository Implementation
//!
//! PostgreSQL implementation of the UserRepository trait.
//! Username and email lookups are case-insensitive, matching the
//! `LOWER(...)` unique indexes on the users table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{NewUser, PageRequest, User, UserRepository, UserScore};
use crate::infrastructure::database::conflict_on_unique;
use crate::shared::error::AppError;

const USER_COLUMNS: &str =
    "u.id, u.username, u.email, u.password_hash, u.about_me, u.last_seen, u.created_at, u.updated_at";

/// Net score of every vote cast on posts the user wrote.
const USER_SCORE_SQL: &str = r#"
    COALESCE((
        SELECT SUM(CASE WHEN v.liked THEN 1 ELSE -1 END)
        FROM post_votes v
        JOIN posts p ON p.id = v.post_id
        WHERE p.author_id = u.id
    ), 0)::BIGINT
"#;

/// Database row representation of the users table.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    about_me: Option<String>,
    last_seen: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            about_me: self.about_me,
            last_seen: self.last_seen,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserScoreRow {
    #[sqlx(flatten)]
    user: UserRow,
    score: i64,
}

/// PostgreSQL user repository implementation.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users u WHERE u.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users u WHERE LOWER(u.username) = LOWER($1)"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users u WHERE LOWER(u.email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn create(&self, user: &NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users AS u (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING u.id, u.username, u.email, u.password_hash, u.about_me,
                      u.last_seen, u.created_at, u.updated_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "User with this email or username already exists"))?;

        Ok(row.into_user())
    }

    async fn update_about_me(&self, id: i64, about_me: Option<&str>) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users AS u
            SET about_me = $2, updated_at = NOW()
            WHERE u.id = $1
            RETURNING u.id, u.username, u.email, u.password_hash, u.about_me,
                      u.last_seen, u.created_at, u.updated_at
            "#,
        )
        .bind(id)
        .bind(about_me)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;

        Ok(row.into_user())
    }

    async fn touch_last_seen(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_seen = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn score(&self, id: i64) -> Result<i64, AppError> {
        let score = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT {USER_SCORE_SQL} FROM users u WHERE u.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;

        Ok(score)
    }

    async fn leaderboard(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<UserScore>, AppError> {
        let rows = sqlx::query_as::<_, UserScoreRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}, {USER_SCORE_SQL} AS score
            FROM users u
            WHERE ($1::TEXT IS NULL OR strpos(u.username, $1) > 0)
            ORDER BY score DESC, u.id ASC
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
            .map(|r| UserScore {
                user: r.user.into_user(),
                score: r.score,
            })
            .collect())
    }
}
