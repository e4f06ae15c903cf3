//! # Domain Layer
//!
//! The domain layer contains the core business logic of the forum.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (User, Chat, Post, Comment, Vote, etc.)
//! - **value_objects**: Immutable value types (VoteTarget, VoteTally, Page)
//! - **services**: Domain services for cross-entity rules
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts
//! - Entities encapsulate domain behavior

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;
