//! # Domain Services
//!
//! Domain services encapsulate business rules that don't naturally
//! belong to a single entity.
//!
//! ## Services
//!
//! - **ModerationService**: who may edit chats and delete posts

mod moderation_service;

pub use moderation_service::*;
