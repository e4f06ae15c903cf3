//! Chat Service
//!
//! Chat pages, creation, description edits and the explore listing.

use std::sync::Arc;

use async_trait::async_trait;

use super::views::{chat_view, ViewBuilder};
use crate::application::dto::response::{ChatView, PostView};
use crate::domain::services::ModerationService;
use crate::domain::{
    Chat, ChatRepository, NewChat, Page, PageRequest, PostRepository, SubscriptionRepository,
};
use crate::infrastructure::metrics::{record_forum_action, ForumAction};
use crate::shared::error::AppError;

/// Everything the chat page shows.
#[derive(Debug)]
pub struct ChatPage {
    pub chat: ChatView,
    pub subscribed: Option<bool>,
    pub can_edit: bool,
    pub posts: Page<PostView>,
}

/// Chat service trait
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Look up a chat by name, ignoring case
    async fn get(&self, name: &str) -> Result<Chat, ChatError>;

    /// Chat details and one page of its posts, newest first
    async fn chat_page(
        &self,
        name: &str,
        viewer_id: Option<i64>,
        page: PageRequest,
    ) -> Result<ChatPage, ChatError>;

    /// Create a chat; the creator is subscribed in the same transaction
    async fn create(&self, creator_id: i64, name: &str, about: &str) -> Result<Chat, ChatError>;

    /// Chat to prefill the edit form with, if the user may edit it
    async fn editable(&self, user_id: i64, name: &str) -> Result<Chat, ChatError>;

    /// Replace the description of a chat the user created
    async fn edit(&self, user_id: i64, name: &str, about: &str) -> Result<Chat, ChatError>;

    /// Chats ordered by subscriber count, optionally filtered on name or description
    async fn explore(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<ChatView>, ChatError>;

    /// Every chat name, for the new-post form
    async fn names(&self) -> Result<Vec<String>, ChatError>;
}

/// Chat service errors
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Chat {0} not found.")]
    NotFound(String),

    #[error("That chat name is already taken.")]
    NameTaken,

    #[error("You cannot edit this chat.")]
    NotCreator,

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::NotFound(_) => AppError::NotFound(err.to_string()),
            ChatError::NameTaken => AppError::field("name", err.to_string()),
            ChatError::NotCreator => AppError::Forbidden(err.to_string()),
            ChatError::Repository(e) => e,
        }
    }
}

/// ChatService implementation
pub struct ChatServiceImpl {
    chat_repo: Arc<dyn ChatRepository>,
    post_repo: Arc<dyn PostRepository>,
    sub_repo: Arc<dyn SubscriptionRepository>,
    views: ViewBuilder,
}

impl ChatServiceImpl {
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
}

#[async_trait]
impl ChatService for ChatServiceImpl {
    async fn get(&self, name: &str) -> Result<Chat, ChatError> {
        self.chat_repo
            .find_by_name(name)
            .await?
            .ok_or_else(|| ChatError::NotFound(name.to_string()))
    }

    async fn chat_page(
        &self,
        name: &str,
        viewer_id: Option<i64>,
        page: PageRequest,
    ) -> Result<ChatPage, ChatError> {
        let chat = self.get(name).await?;

        let subscribed = match viewer_id {
            Some(user_id) => Some(self.sub_repo.exists(user_id, chat.id).await?),
            None => None,
        };
        let can_edit = viewer_id
            .map(|user_id| ModerationService::can_edit_chat(user_id, &chat))
            .unwrap_or(false);

        let posts = self.post_repo.list_by_chat(chat.id, page).await?;
        let posts = Page::from_overfetch(posts, page);
        let items = self.views.posts(&posts.items).await?;

        Ok(ChatPage {
            chat: self.views.chat(&chat).await?,
            subscribed,
            can_edit,
            posts: posts.with_items(items),
        })
    }

    async fn create(&self, creator_id: i64, name: &str, about: &str) -> Result<Chat, ChatError> {
        let name = name.trim();
        if self.chat_repo.find_by_name(name).await?.is_some() {
            return Err(ChatError::NameTaken);
        }

        let new_chat = NewChat {
            name: name.to_string(),
            about: about.to_string(),
            creator_id,
        };
        let chat = match self.chat_repo.create(&new_chat).await {
            Ok(chat) => chat,
            Err(AppError::Conflict(_)) => return Err(ChatError::NameTaken),
            Err(e) => return Err(e.into()),
        };

        record_forum_action(ForumAction::ChatCreated);
        tracing::info!(chat_id = chat.id, name = %chat.name, creator_id, "Chat created");
        Ok(chat)
    }

    async fn editable(&self, user_id: i64, name: &str) -> Result<Chat, ChatError> {
        let chat = self.get(name).await?;
        if !ModerationService::can_edit_chat(user_id, &chat) {
            return Err(ChatError::NotCreator);
        }
        Ok(chat)
    }

    async fn edit(&self, user_id: i64, name: &str, about: &str) -> Result<Chat, ChatError> {
        let chat = self.editable(user_id, name).await?;
        let chat = self.chat_repo.update_about(chat.id, about).await?;

        tracing::info!(chat_id = chat.id, user_id, "Chat description updated");
        Ok(chat)
    }

    async fn explore(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<ChatView>, ChatError> {
        let rows = self.chat_repo.explore(search, page).await?;
        let rows = Page::from_overfetch(rows, page);
        let items = rows
            .items
            .iter()
            .map(|row| chat_view(&row.chat, row.subscriber_count))
            .collect();

        Ok(rows.with_items(items))
    }

    async fn names(&self) -> Result<Vec<String>, ChatError> {
        Ok(self.chat_repo.list_names().await?)
    }
}
