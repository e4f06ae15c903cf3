//! Middleware
//!
//! Tower middleware for request processing.

pub mod auth;
pub mod cors;
pub mod logging;
pub mod security;

pub use auth::{auth_middleware, optional_auth_middleware, AuthUser};
pub use cors::create_cors_layer;
pub use logging::{create_trace_layer, track_metrics};
pub use security::{create_security_headers_layer, SecurityHeadersConfig, SecurityHeadersLayer};
