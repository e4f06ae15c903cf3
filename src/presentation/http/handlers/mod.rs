//! HTTP Handlers
//!
//! Request handlers for the JSON API, grouped by resource.

pub mod auth;
pub mod chats;
pub mod front;
pub mod health;
pub mod posts;
pub mod users;
pub mod votes;
