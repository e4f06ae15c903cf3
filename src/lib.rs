//! # OpenChat Library
//!
//! This crate provides a community forum server with:
//! - Chats that users create and subscribe to
//! - Posts with optional image attachments, and comments on them
//! - Up/down votes on posts and comments, with a user leaderboard
//! - A JSON HTTP API backed by PostgreSQL
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core business entities and repository traits
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: Database, file storage and metrics
//! - **Presentation Layer**: HTTP handlers, extractors and middleware
//!
//! ## Module Structure
//!
//! ```text
//! openchat/
//! +-- config/         Configuration management
//! +-- domain/         Domain entities, value objects, and traits
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Database, storage and metrics implementations
//! +-- presentation/   HTTP routes, handlers and middleware
//! +-- shared/         Common utilities (errors, validation)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
