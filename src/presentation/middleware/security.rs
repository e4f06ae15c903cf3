//! Security Headers Middleware
//!
//! Stamps a fixed set of security headers onto every response. The header
//! values are parsed once when the layer is built.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Request, Response},
};
use tower::{Layer, Service};

/// Security headers configuration
#[derive(Clone, Debug)]
pub struct SecurityHeadersConfig {
    /// Send Strict-Transport-Security (only meaningful behind HTTPS)
    pub enable_hsts: bool,
    /// HSTS max-age in seconds
    pub hsts_max_age: u64,
    pub content_security_policy: String,
    pub referrer_policy: String,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            enable_hsts: true,
            hsts_max_age: 31_536_000,
            // avatars come from Gravatar, uploads from our own origin
            content_security_policy:
                "default-src 'self'; img-src 'self' https://www.gravatar.com".to_string(),
            referrer_policy: "strict-origin-when-cross-origin".to_string(),
        }
    }
}

impl SecurityHeadersConfig {
    /// HSTS only in production; local development runs over plain HTTP.
    pub fn for_environment(is_production: bool) -> Self {
        Self {
            enable_hsts: is_production,
            ..Default::default()
        }
    }

    fn headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        let mut headers = vec![
            (
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ),
            (header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
        ];

        if self.enable_hsts {
            if let Ok(value) = HeaderValue::from_str(&format!(
                "max-age={}; includeSubDomains",
                self.hsts_max_age
            )) {
                headers.push((header::STRICT_TRANSPORT_SECURITY, value));
            }
        }
        if let Ok(value) = HeaderValue::from_str(&self.content_security_policy) {
            headers.push((header::CONTENT_SECURITY_POLICY, value));
        }
        if let Ok(value) = HeaderValue::from_str(&self.referrer_policy) {
            headers.push((header::REFERRER_POLICY, value));
        }

        headers
    }
}

/// Layer that adds security headers to responses
#[derive(Clone)]
pub struct SecurityHeadersLayer {
    headers: Arc<Vec<(HeaderName, HeaderValue)>>,
}

impl SecurityHeadersLayer {
    pub fn new(config: SecurityHeadersConfig) -> Self {
        Self {
            headers: Arc::new(config.headers()),
        }
    }
}

impl<S> Layer<S> for SecurityHeadersLayer {
    type Service = SecurityHeadersMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecurityHeadersMiddleware {
            inner,
            headers: self.headers.clone(),
        }
    }
}

/// Middleware service that adds security headers
#[derive(Clone)]
pub struct SecurityHeadersMiddleware<S> {
    inner: S,
    headers: Arc<Vec<(HeaderName, HeaderValue)>>,
}

impl<S> Service<Request<Body>> for SecurityHeadersMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        // the ready service must be the one that handles the call
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let headers = self.headers.clone();

        Box::pin(async move {
            let mut response = inner.call(request).await?;
            let response_headers = response.headers_mut();
            for (name, value) in headers.iter() {
                response_headers.insert(name.clone(), value.clone());
            }
            Ok(response)
        })
    }
}

/// Security headers suited to the running environment
pub fn create_security_headers_layer(is_production: bool) -> SecurityHeadersLayer {
    SecurityHeadersLayer::new(SecurityHeadersConfig::for_environment(is_production))
}
