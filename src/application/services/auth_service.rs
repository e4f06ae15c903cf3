//! Authentication Service
//!
//! Handles account registration, password verification and JWT access
//! tokens.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtSettings;
use crate::domain::{NewUser, User, UserRepository};
use crate::infrastructure::metrics::{record_forum_action, ForumAction};
use crate::shared::error::AppError;

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, AuthTokens), AuthError>;

    /// Authenticate user with credentials
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(User, AuthTokens), AuthError>;

    /// Validate access token and extract user ID
    fn validate_token(&self, access_token: &str) -> Result<i64, AuthError>;

    /// Get current user from access token
    async fn get_current_user(&self, access_token: &str) -> Result<User, AuthError>;
}

/// Issued access token
#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Unique token ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailTaken,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Invalid username or password".into())
            }
            AuthError::TokenExpired => AppError::Unauthorized("Token expired".into()),
            AuthError::InvalidToken => AppError::Unauthorized("Invalid token".into()),
            AuthError::UserNotFound => AppError::Unauthorized("User no longer exists".into()),
            AuthError::EmailTaken => {
                AppError::field("email", "Please use a different email address.")
            }
            AuthError::UsernameTaken => {
                AppError::field("username", "Please use a different username.")
            }
            AuthError::Internal(msg) => AppError::Internal(msg),
            AuthError::Repository(e) => e,
        }
    }
}

/// AuthService implementation
pub struct AuthServiceImpl {
    user_repo: Arc<dyn UserRepository>,
    jwt_settings: JwtSettings,
}

impl AuthServiceImpl {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt_settings: JwtSettings) -> Self {
        Self {
            user_repo,
            jwt_settings,
        }
    }

    /// Hash a password using Argon2id
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against its hash
    fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Sign an access token for a user
    pub fn issue_tokens(&self, user_id: i64) -> Result<AuthTokens, AuthError> {
        let now = Utc::now();
        let expiry = now + Duration::minutes(self.jwt_settings.access_token_expiry_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiry.timestamp(),
            iat: now.timestamp(),
            jti: Some(uuid::Uuid::new_v4().to_string()),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            expires_in: self.jwt_settings.access_token_expiry_minutes * 60,
            token_type: "Bearer".to_string(),
        })
    }

    fn decode_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        Ok(token_data.claims)
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, AuthTokens), AuthError> {
        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let new_user = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: Self::hash_password(password)?,
        };

        let user = match self.user_repo.create(&new_user).await {
            Ok(user) => user,
            // Lost a race with a concurrent registration
            Err(AppError::Conflict(_)) => {
                if self.user_repo.find_by_email(email).await?.is_some() {
                    return Err(AuthError::EmailTaken);
                }
                return Err(AuthError::UsernameTaken);
            }
            Err(e) => return Err(e.into()),
        };

        let tokens = self.issue_tokens(user.id)?;

        record_forum_action(ForumAction::UserRegistered);
        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok((user, tokens))
    }

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(User, AuthTokens), AuthError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.issue_tokens(user.id)?;
        Ok((user, tokens))
    }

    fn validate_token(&self, access_token: &str) -> Result<i64, AuthError> {
        let claims = self.decode_access_token(access_token)?;

        claims
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::InvalidToken)
    }

    async fn get_current_user(&self, access_token: &str) -> Result<User, AuthError> {
        let user_id = self.validate_token(access_token)?;

        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
