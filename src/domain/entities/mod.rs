//! # Domain Entities
//!
//! Core domain entities representing the forum's persistent records.
//! All entities map directly to their corresponding database tables.
//!
//! ## Core Entities
//!
//! - **User**: account with credentials, profile text and last-seen time
//! - **Chat**: a named community room that holds posts
//! - **Post**: a titled submission in a chat, optionally with an image
//! - **Comment**: a reply on a post, optionally to another comment
//!
//! ## Supporting Entities
//!
//! - **Vote**: one user's up/downvote on a post or comment
//! - **Subscription**: a user's membership in a chat
//! - **Image**: an uploaded file attached to a post
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod chat;
mod comment;
mod image;
mod post;
mod subscription;
mod user;
mod vote;

pub use chat::{Chat, ChatRepository, ChatWithSubscribers, NewChat};
pub use comment::{Comment, CommentRepository, NewComment};
pub use image::{Image, ImageRepository, NewImage};
pub use post::{NewPost, Post, PostRepository, PostScore};
pub use subscription::{Subscription, SubscriptionRepository};
pub use user::{NewUser, User, UserRepository, UserScore};
pub use vote::{Vote, VoteRepository};
