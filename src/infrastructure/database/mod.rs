//! Database Module
//!
//! PostgreSQL connection pool, migrations, health probe and transaction management.

pub mod transaction;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::config::DatabaseSettings;
use crate::shared::error::AppError;

pub use transaction::{execute_in_transaction, TxFuture};

/// Create a PostgreSQL connection pool
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
        .connect(&settings.url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Connection pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub idle: u32,
    pub active: u32,
    pub max: u32,
}

/// Connectivity probe used by the readiness endpoint.
#[async_trait]
pub trait DatabaseHealth: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;

    /// Current pool occupancy, when there is a pool to report on.
    fn pool_stats(&self) -> Option<PoolStats> {
        None
    }
}

/// Probe backed by the connection pool.
pub struct PgDatabaseHealth {
    pool: PgPool,
}

impl PgDatabaseHealth {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseHealth for PgDatabaseHealth {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn pool_stats(&self) -> Option<PoolStats> {
        let size = self.pool.size();
        let idle = self.pool.num_idle() as u32;
        Some(PoolStats {
            idle,
            active: size.saturating_sub(idle),
            max: self.pool.options().get_max_connections(),
        })
    }
}

/// Map a unique-constraint violation to `Conflict`, anything else to `Database`.
pub fn conflict_on_unique(e: sqlx::Error, message: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(e),
    }
}

/// Map a foreign-key violation to `NotFound`, anything else to `Database`.
pub fn not_found_on_foreign_key(e: sqlx::Error, message: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::NotFound(message.to_string())
        }
        _ => AppError::Database(e),
    }
}
