//! Repository Implementations
//!
//! PostgreSQL implementations of the domain repository traits, plus the
//! [`Repositories`] bundle handed to the application services.
//!
//! ## Available Repositories
//!
//! - **PgUserRepository** - accounts, last-seen tracking, leaderboard
//! - **PgChatRepository** - chats and the explore listing
//! - **PgSubscriptionRepository** - user/chat subscriptions
//! - **PgPostRepository** - posts, feeds and the popular listing
//! - **PgCommentRepository** - comments on posts
//! - **PgImageRepository** - post image metadata
//! - **PgVoteRepository** - post and comment votes
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use openchat::infrastructure::repositories::Repositories;
//!
//! let repos = Repositories::postgres(pool.clone());
//! let chat = repos.chats.find_by_name("tech").await?;
//! ```

pub mod chat_repository;
pub mod comment_repository;
pub mod image_repository;
pub mod post_repository;
pub mod subscription_repository;
pub mod user_repository;
pub mod vote_repository;

use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::{
    ChatRepository, CommentRepository, ImageRepository, PostRepository, SubscriptionRepository,
    UserRepository, VoteRepository,
};

pub use chat_repository::PgChatRepository;
pub use comment_repository::PgCommentRepository;
pub use image_repository::PgImageRepository;
pub use post_repository::PgPostRepository;
pub use subscription_repository::PgSubscriptionRepository;
pub use user_repository::PgUserRepository;
pub use vote_repository::PgVoteRepository;

/// Every repository the application needs, behind trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub chats: Arc<dyn ChatRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub images: Arc<dyn ImageRepository>,
    pub votes: Arc<dyn VoteRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            chats: Arc::new(PgChatRepository::new(pool.clone())),
            subscriptions: Arc::new(PgSubscriptionRepository::new(pool.clone())),
            posts: Arc::new(PgPostRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool.clone())),
            images: Arc::new(PgImageRepository::new(pool.clone())),
            votes: Arc::new(PgVoteRepository::new(pool)),
        }
    }
}
