//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database pool, migrations and repositories (PostgreSQL)
//! - Local image storage
//! - Prometheus metrics

pub mod database;
pub mod metrics;
pub mod repositories;
pub mod storage;
