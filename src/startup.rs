//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;

use crate::application::services::Services;
use crate::config::Settings;
use crate::infrastructure::database::{self, DatabaseHealth, PgDatabaseHealth};
use crate::infrastructure::repositories::Repositories;
use crate::infrastructure::storage::{ImageStore, LocalImageStore};
use crate::presentation::http::{handlers, routes};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub services: Services,
    pub images: Arc<dyn ImageStore>,
    pub health: Arc<dyn DatabaseHealth>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wire the services over a set of repositories and an image store
    pub fn new(
        repos: Repositories,
        images: Arc<dyn ImageStore>,
        health: Arc<dyn DatabaseHealth>,
        settings: Settings,
    ) -> Self {
        let services = Services::new(&repos, images.clone(), &settings);
        Self {
            repos,
            services,
            images,
            health,
            settings: Arc::new(settings),
        }
    }
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        handlers::health::init_server_start();

        // Create database pool
        let db = database::create_pool(&settings.database)
            .await
            .context("Failed to connect to the database")?;
        tracing::info!("Database connection pool created");

        if settings.database.run_migrations {
            database::run_migrations(&db)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");
        }

        let images: Arc<dyn ImageStore> = Arc::new(
            LocalImageStore::new(&settings.uploads)
                .await
                .context("Failed to prepare the upload directory")?,
        );
        tracing::info!(directory = %settings.uploads.directory, "Image store ready");

        let addr = settings.server_addr();
        let state = AppState::new(
            Repositories::postgres(db.clone()),
            images,
            Arc::new(PgDatabaseHealth::new(db)),
            settings,
        );

        let router = build_router(state);

        // Bind to address
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

/// Router with every route and middleware layer over the given state
pub fn build_router(state: AppState) -> Router {
    routes::create_router(state)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
