//! Subscription Service
//!
//! Membership of users in chats and the personal feed built from it.

use std::sync::Arc;

use async_trait::async_trait;

use super::views::ViewBuilder;
use crate::application::dto::response::PostView;
use crate::domain::{
    Chat, ChatRepository, Page, PageRequest, PostRepository, SubscriptionRepository,
};
use crate::infrastructure::metrics::{record_forum_action, ForumAction};
use crate::shared::error::AppError;

/// Subscription service trait
#[async_trait]
pub trait SubscriptionService: Send + Sync {
    /// Subscribe to a chat; subscribing again changes nothing
    async fn subscribe(&self, user_id: i64, chat_name: &str) -> Result<Chat, SubscriptionError>;

    /// Unsubscribe from a chat; a no-op when not subscribed
    async fn unsubscribe(&self, user_id: i64, chat_name: &str)
        -> Result<Chat, SubscriptionError>;

    /// Subscribe or unsubscribe depending on `subscribed`
    async fn set_subscribed(
        &self,
        user_id: i64,
        chat_name: &str,
        subscribed: bool,
    ) -> Result<Chat, SubscriptionError>;

    async fn is_subscribed(&self, user_id: i64, chat_id: i64) -> Result<bool, SubscriptionError>;

    /// Chats the user subscribes to, by name
    async fn subscriptions(&self, user_id: i64) -> Result<Vec<Chat>, SubscriptionError>;

    /// Posts from every subscribed chat, newest first
    async fn subscribed_posts(
        &self,
        user_id: i64,
        page: PageRequest,
    ) -> Result<Page<PostView>, SubscriptionError>;
}

/// Subscription service errors
#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    #[error("Chat {0} not found.")]
    ChatNotFound(String),

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<SubscriptionError> for AppError {
    fn from(err: SubscriptionError) -> Self {
        match err {
            SubscriptionError::ChatNotFound(_) => AppError::NotFound(err.to_string()),
            SubscriptionError::Repository(e) => e,
        }
    }
}

/// SubscriptionService implementation
pub struct SubscriptionServiceImpl {
    chat_repo: Arc<dyn ChatRepository>,
    post_repo: Arc<dyn PostRepository>,
    sub_repo: Arc<dyn SubscriptionRepository>,
    views: ViewBuilder,
}

impl SubscriptionServiceImpl {
    pub fn new(
        chat_repo: Arc<dyn ChatRepository>,
        post_repo: Arc<dyn PostRepository>,
        sub_repo: Arc<dyn SubscriptionRepository>,
        views: ViewBuilder,
    ) -> Self {
        Self {
            chat_repo,
            post_repo,
            sub_repo,
            views,
        }
    }

    async fn find_chat(&self, name: &str) -> Result<Chat, SubscriptionError> {
        self.chat_repo
            .find_by_name(name)
            .await?
            .ok_or_else(|| SubscriptionError::ChatNotFound(name.to_string()))
    }
}

#[async_trait]
impl SubscriptionService for SubscriptionServiceImpl {
    async fn subscribe(&self, user_id: i64, chat_name: &str) -> Result<Chat, SubscriptionError> {
        self.set_subscribed(user_id, chat_name, true).await
    }

    async fn unsubscribe(
        &self,
        user_id: i64,
        chat_name: &str,
    ) -> Result<Chat, SubscriptionError> {
        self.set_subscribed(user_id, chat_name, false).await
    }

    async fn set_subscribed(
        &self,
        user_id: i64,
        chat_name: &str,
        subscribed: bool,
    ) -> Result<Chat, SubscriptionError> {
        let chat = self.find_chat(chat_name).await?;

        if subscribed {
            if self.sub_repo.insert(user_id, chat.id).await? {
                record_forum_action(ForumAction::Subscribed);
                tracing::info!(user_id, chat_id = chat.id, "Subscribed to chat");
            }
        } else if self.sub_repo.delete(user_id, chat.id).await? {
            record_forum_action(ForumAction::Unsubscribed);
            tracing::info!(user_id, chat_id = chat.id, "Unsubscribed from chat");
        }

        Ok(chat)
    }

    async fn is_subscribed(&self, user_id: i64, chat_id: i64) -> Result<bool, SubscriptionError> {
        Ok(self.sub_repo.exists(user_id, chat_id).await?)
    }

    async fn subscriptions(&self, user_id: i64) -> Result<Vec<Chat>, SubscriptionError> {
        Ok(self.sub_repo.chats_for_user(user_id).await?)
    }

    async fn subscribed_posts(
        &self,
        user_id: i64,
        page: PageRequest,
    ) -> Result<Page<PostView>, SubscriptionError> {
        let posts = self.post_repo.list_subscribed(user_id, page).await?;
        let posts = Page::from_overfetch(posts, page);
        let items = self.views.posts(&posts.items).await?;

        Ok(posts.with_items(items))
    }
}
