//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::value_objects::PageRequest;
use crate::shared::error::AppError;

/// Represents a user account.
///
/// Maps to the `users` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - username: VARCHAR(64) NOT NULL (unique on LOWER(username))
/// - email: VARCHAR(300) NOT NULL (unique on LOWER(email))
/// - password_hash: VARCHAR(255) NOT NULL
/// - about_me: VARCHAR(300) NULL
/// - last_seen: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Username (1-64 printable ASCII characters, unique ignoring case)
    pub username: String,

    /// Email address (unique ignoring case)
    pub email: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Free-form profile text
    pub about_me: Option<String>,

    /// Time of the user's last authenticated request
    pub last_seen: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub const USERNAME_MAX_LEN: usize = 64;
    pub const EMAIL_MAX_LEN: usize = 300;
    pub const ABOUT_ME_MAX_LEN: usize = 300;

    /// Gravatar identicon URL for this user's email.
    pub fn avatar_url(&self, size: u32) -> String {
        let digest = Sha256::digest(self.email.trim().to_lowercase().as_bytes());
        format!(
            "https://www.gravatar.com/avatar/{:x}?d=identicon&s={}",
            digest, size
        )
    }
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            username: String::new(),
            email: String::new(),
            password_hash: String::new(),
            about_me: None,
            last_seen: now,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields required to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// A user ranked by the sum of their posts' scores.
#[derive(Debug, Clone)]
pub struct UserScore {
    pub user: User,
    pub score: i64,
}

/// Repository trait for User data access operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Find a user by username, ignoring case.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Find a user by email, ignoring case.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Insert a new user. A username/email collision is a `Conflict`.
    async fn create(&self, user: &NewUser) -> Result<User, AppError>;

    /// Replace the about-me text.
    async fn update_about_me(&self, id: i64, about_me: Option<&str>) -> Result<User, AppError>;

    /// Stamp `last_seen` with the current time.
    async fn touch_last_seen(&self, id: i64) -> Result<(), AppError>;

    /// Sum of the scores of every post the user authored.
    async fn score(&self, id: i64) -> Result<i64, AppError>;

    /// Users ordered by score, highest first, optionally filtered by a
    /// username substring. Returns up to `page.fetch_limit()` rows.
    async fn leaderboard(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<UserScore>, AppError>;
}
