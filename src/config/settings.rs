//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// JWT authentication settings
    pub jwt: JwtSettings,

    /// Image upload storage
    pub uploads: UploadSettings,

    /// Page sizes for listings
    pub pagination: PaginationSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,

    /// Apply pending migrations at startup
    pub run_migrations: bool,
}

/// JWT authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens
    pub secret: String,

    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,
}

/// Image upload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    /// Directory uploaded files are written to
    pub directory: String,

    /// URL path prefix the directory is served under (e.g. "/static/uploads")
    pub url_prefix: String,

    /// Largest accepted request body in bytes
    pub max_size_bytes: usize,
}

/// Fixed page size per listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationSettings {
    pub posts_per_page: u32,
    pub comments_per_page: u32,
    pub chats_per_page: u32,
    pub users_per_page: u32,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            posts_per_page: 50,
            comments_per_page: 50,
            chats_per_page: 50,
            users_per_page: 50,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

/// Minimum required length for JWT secret (256 bits = 32 bytes)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the JWT secret is too short.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("database.run_migrations", true)?
            .set_default("jwt.access_token_expiry_minutes", 60 * 24)?
            .set_default("uploads.directory", "static/uploads")?
            .set_default("uploads.url_prefix", "/static/uploads")?
            .set_default("uploads.max_size_bytes", 16_i64 * 1024 * 1024)?
            .set_default("pagination.posts_per_page", 50)?
            .set_default("pagination.comments_per_page", 50)?
            .set_default("pagination.chats_per_page", 50)?
            .set_default("pagination.users_per_page", 50)?
            .set_default("cors.allowed_origins", vec!["http://localhost:5000"])?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SERVER__PORT=5000 -> server.port = 5000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("uploads.directory", std::env::var("UPLOAD_DIR").ok())?
            .build()?
            .try_deserialize()
            .and_then(Self::validate)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "JWT secret must be at least {} characters. Current length: {}",
                MIN_JWT_SECRET_LENGTH,
                self.jwt.secret.len()
            )));
        }
        let prefix = &self.uploads.url_prefix;
        if !prefix.starts_with('/') || prefix.ends_with('/') {
            return Err(ConfigError::Message(format!(
                "uploads.url_prefix must be an absolute path without a trailing '/': {}",
                prefix
            )));
        }
        Ok(self)
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Whether logs should be emitted as JSON.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

impl UploadSettings {
    /// Public URL for a stored filename.
    pub fn url_for(&self, filename: &str) -> String {
        format!("{}/{}", self.url_prefix.trim_end_matches('/'), filename)
    }
}
