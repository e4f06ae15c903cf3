//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AuthService**: Registration, login, JWT access tokens
//! - **UserService**: Profiles, about-me edits, leaderboard
//! - **ChatService**: Chat pages, creation, edits, explore listing
//! - **SubscriptionService**: Chat membership and the personal feed
//! - **PostService**: Posts, comments, image attachments, popular listing
//! - **VoteService**: Votes on posts and comments, scores

pub mod auth_service;
pub mod chat_service;
pub mod post_service;
pub mod subscription_service;
pub mod user_service;
pub mod views;
pub mod vote_service;

use std::sync::Arc;

use crate::config::Settings;
use crate::infrastructure::repositories::Repositories;
use crate::infrastructure::storage::ImageStore;

pub use auth_service::{AuthError, AuthService, AuthServiceImpl, AuthTokens, Claims};
pub use chat_service::{ChatError, ChatPage, ChatService, ChatServiceImpl};
pub use post_service::{
    MakePost, PostError, PostPage, PostService, PostServiceImpl, UploadedImage,
};
pub use subscription_service::{SubscriptionError, SubscriptionService, SubscriptionServiceImpl};
pub use user_service::{UserError, UserService, UserServiceImpl};
pub use views::ViewBuilder;
pub use vote_service::{VoteError, VoteOutcome, VoteService, VoteServiceImpl};

/// Every application service, wired to one set of repositories.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<AuthServiceImpl>,
    pub users: Arc<dyn UserService>,
    pub chats: Arc<dyn ChatService>,
    pub subscriptions: Arc<dyn SubscriptionService>,
    pub posts: Arc<dyn PostService>,
    pub votes: Arc<dyn VoteService>,
    pub views: ViewBuilder,
}

impl Services {
    pub fn new(repos: &Repositories, images: Arc<dyn ImageStore>, settings: &Settings) -> Self {
        let views = ViewBuilder::new(repos.clone());

        Self {
            auth: Arc::new(AuthServiceImpl::new(
                repos.users.clone(),
                settings.jwt.clone(),
            )),
            users: Arc::new(UserServiceImpl::new(
                repos.users.clone(),
                repos.posts.clone(),
                views.clone(),
            )),
            chats: Arc::new(ChatServiceImpl::new(
                repos.chats.clone(),
                repos.posts.clone(),
                repos.subscriptions.clone(),
                views.clone(),
            )),
            subscriptions: Arc::new(SubscriptionServiceImpl::new(
                repos.chats.clone(),
                repos.posts.clone(),
                repos.subscriptions.clone(),
                views.clone(),
            )),
            posts: Arc::new(PostServiceImpl::new(
                repos.posts.clone(),
                repos.chats.clone(),
                repos.comments.clone(),
                images,
                views.clone(),
            )),
            votes: Arc::new(VoteServiceImpl::new(
                repos.votes.clone(),
                repos.posts.clone(),
                repos.comments.clone(),
            )),
            views,
        }
    }
}
