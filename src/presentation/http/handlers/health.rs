//! Health Check Handlers
//!
//! Liveness and readiness probes plus the Prometheus scrape endpoint.
//!
//! # Endpoints
//! - `GET /health` - Basic health check
//! - `GET /health/live` - Liveness probe (is the server running?)
//! - `GET /health/ready` - Readiness probe (can the database be reached?)
//! - `GET /metrics` - Prometheus text format

use std::time::Instant;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::infrastructure::metrics;
use crate::startup::AppState;

static SERVER_START: Lazy<Instant> = Lazy::new(Instant::now);
static SERVER_START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Database round trips slower than this report as degraded.
const DEGRADED_LATENCY_MS: u64 = 100;

/// Pin the uptime clock to process start
pub fn init_server_start() {
    Lazy::force(&SERVER_START);
    Lazy::force(&SERVER_START_TIME);
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Readiness report
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub started_at: DateTime<Utc>,
    pub database: ServiceHealth,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

pub async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "alive" }))
}

/// Returns 503 when the database cannot be reached
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let database = check_database(&state).await;

    let status_code = match database.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    let response = ReadinessResponse {
        status: database.status,
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: SERVER_START.elapsed().as_secs(),
        started_at: *SERVER_START_TIME,
        database,
    };

    (status_code, Json(response))
}

async fn check_database(state: &AppState) -> ServiceHealth {
    let start = Instant::now();
    match state.health.ping().await {
        Ok(()) => {
            let latency = start.elapsed().as_millis() as u64;
            ServiceHealth {
                status: classify_latency(latency),
                latency_ms: Some(latency),
                message: None,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Database readiness check failed");
            ServiceHealth {
                status: HealthStatus::Unhealthy,
                latency_ms: None,
                message: Some("Database connection failed".into()),
            }
        }
    }
}

fn classify_latency(latency_ms: u64) -> HealthStatus {
    if latency_ms < DEGRADED_LATENCY_MS {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    }
}

/// Prometheus metrics endpoint handler
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    if let Some(stats) = state.health.pool_stats() {
        metrics::update_db_pool_stats(stats.idle, stats.active, stats.max);
    }

    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        metrics::gather_metrics(),
    )
}
