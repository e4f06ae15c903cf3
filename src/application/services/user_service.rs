//! User Service
//!
//! Profiles, the about-me edit and the leaderboard.

use std::sync::Arc;

use async_trait::async_trait;

use super::views::{user_view, ViewBuilder};
use crate::application::dto::response::{PostView, UserView};
use crate::domain::{Page, PageRequest, User, UserRepository, PostRepository};
use crate::shared::error::AppError;

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// Look up a user by username, ignoring case
    async fn get_by_username(&self, username: &str) -> Result<User, UserError>;

    /// Profile view and one page of the user's posts, newest first
    async fn profile(
        &self,
        username: &str,
        page: PageRequest,
    ) -> Result<(UserView, Page<PostView>), UserError>;

    /// Replace the about-me text; blank input clears it
    async fn update_about_me(&self, user_id: i64, about_me: Option<&str>)
        -> Result<User, UserError>;

    /// Users ordered by score, optionally filtered by a username substring
    async fn leaderboard(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<UserView>, UserError>;
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(name) => AppError::NotFound(format!("User {} not found", name)),
            UserError::Repository(e) => e,
        }
    }
}

/// UserService implementation
pub struct UserServiceImpl {
    user_repo: Arc<dyn UserRepository>,
    post_repo: Arc<dyn PostRepository>,
    views: ViewBuilder,
}

impl UserServiceImpl {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        post_repo: Arc<dyn PostRepository>,
        views: ViewBuilder,
    ) -> Self {
        Self {
            user_repo,
            post_repo,
            views,
        }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn get_by_username(&self, username: &str) -> Result<User, UserError> {
        self.user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| UserError::NotFound(username.to_string()))
    }

    async fn profile(
        &self,
        username: &str,
        page: PageRequest,
    ) -> Result<(UserView, Page<PostView>), UserError> {
        let user = self.get_by_username(username).await?;
        let user_view = self.views.user(&user).await?;

        let posts = self.post_repo.list_by_author(user.id, page).await?;
        let posts = Page::from_overfetch(posts, page);
        let items = self.views.posts(&posts.items).await?;

        Ok((user_view, posts.with_items(items)))
    }

    async fn update_about_me(
        &self,
        user_id: i64,
        about_me: Option<&str>,
    ) -> Result<User, UserError> {
        let about_me = about_me.map(str::trim).filter(|s| !s.is_empty());
        let user = self.user_repo.update_about_me(user_id, about_me).await?;

        tracing::info!(user_id, "Profile updated");
        Ok(user)
    }

    async fn leaderboard(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<UserView>, UserError> {
        let rows = self.user_repo.leaderboard(search, page).await?;
        let rows = Page::from_overfetch(rows, page);
        let items = rows
            .items
            .iter()
            .map(|row| user_view(&row.user, row.score))
            .collect();

        Ok(rows.with_items(items))
    }
}
