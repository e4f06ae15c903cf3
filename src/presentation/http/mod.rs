//! HTTP API: handlers, extractors, page paths and the router.

pub mod extractors;
pub mod handlers;
pub mod paths;
pub mod routes;
