//! View assembly
//!
//! Turns domain entities into the response views, resolving author names,
//! chat names, images, scores and counts through the repositories. Names
//! resolved once are reused for the rest of the batch.

use std::collections::HashMap;

use crate::application::dto::response::{
    AccountView, ChatView, CommentView, ImageView, PostView, UserView,
};
use crate::domain::{Chat, Comment, Post, User, VoteTarget};
use crate::infrastructure::repositories::Repositories;
use crate::shared::error::AppError;

/// Avatar size used in every user view.
pub const AVATAR_SIZE: u32 = 128;

#[derive(Clone)]
pub struct ViewBuilder {
    repos: Repositories,
}

impl ViewBuilder {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn user(&self, user: &User) -> Result<UserView, AppError> {
        let score = self.repos.users.score(user.id).await?;
        Ok(user_view(user, score))
    }

    pub async fn account(&self, user: &User) -> Result<AccountView, AppError> {
        Ok(AccountView {
            user: self.user(user).await?,
            email: user.email.clone(),
        })
    }

    pub async fn chat(&self, chat: &Chat) -> Result<ChatView, AppError> {
        let subscriber_count = self.repos.subscriptions.count_for_chat(chat.id).await?;
        Ok(chat_view(chat, subscriber_count))
    }

    pub async fn post(&self, post: &Post) -> Result<PostView, AppError> {
        let mut names = NameCache::default();
        self.post_cached(post, &mut names).await
    }

    pub async fn posts(&self, posts: &[Post]) -> Result<Vec<PostView>, AppError> {
        let mut names = NameCache::default();
        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            views.push(self.post_cached(post, &mut names).await?);
        }
        Ok(views)
    }

    pub async fn comments(&self, comments: &[Comment]) -> Result<Vec<CommentView>, AppError> {
        let mut names = NameCache::default();
        let mut views = Vec::with_capacity(comments.len());
        for comment in comments {
            let tally = self
                .repos
                .votes
                .tally(VoteTarget::Comment(comment.id))
                .await?;
            views.push(CommentView {
                id: comment.id,
                body: comment.body.clone(),
                author_id: comment.author_id,
                author: self.username(comment.author_id, &mut names).await?,
                post_id: comment.post_id,
                parent_id: comment.parent_id,
                score: tally.score(),
                upvotes: tally.upvotes,
                downvotes: tally.downvotes,
                created_at: comment.created_at,
            });
        }
        Ok(views)
    }

    async fn post_cached(&self, post: &Post, names: &mut NameCache) -> Result<PostView, AppError> {
        let tally = self.repos.votes.tally(VoteTarget::Post(post.id)).await?;
        let image = self.repos.images.find_by_post(post.id).await?;
        let comment_count = self.repos.comments.count_by_post(post.id).await?;

        Ok(PostView {
            id: post.id,
            title: post.title.clone(),
            body: post.body.clone(),
            author_id: post.author_id,
            author: self.username(post.author_id, names).await?,
            chat_id: post.chat_id,
            chat: self.chat_name(post.chat_id, names).await?,
            image: image.map(|i| ImageView {
                filename: i.filename,
                url: i.url,
            }),
            score: tally.score(),
            upvotes: tally.upvotes,
            downvotes: tally.downvotes,
            comment_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
    }

    async fn username(
        &self,
        user_id: Option<i64>,
        names: &mut NameCache,
    ) -> Result<Option<String>, AppError> {
        let Some(id) = user_id else {
            return Ok(None);
        };
        if let Some(name) = names.users.get(&id) {
            return Ok(name.clone());
        }
        let name = self.repos.users.find_by_id(id).await?.map(|u| u.username);
        names.users.insert(id, name.clone());
        Ok(name)
    }

    async fn chat_name(&self, chat_id: i64, names: &mut NameCache) -> Result<String, AppError> {
        if let Some(name) = names.chats.get(&chat_id) {
            return Ok(name.clone());
        }
        let name = self
            .repos
            .chats
            .find_by_id(chat_id)
            .await?
            .map(|c| c.name)
            .ok_or_else(|| AppError::Internal(format!("Post references missing chat {}", chat_id)))?;
        names.chats.insert(chat_id, name.clone());
        Ok(name)
    }
}

#[derive(Default)]
struct NameCache {
    users: HashMap<i64, Option<String>>,
    chats: HashMap<i64, String>,
}

pub fn user_view(user: &User, score: i64) -> UserView {
    UserView {
        id: user.id,
        username: user.username.clone(),
        about_me: user.about_me.clone(),
        avatar_url: user.avatar_url(AVATAR_SIZE),
        score,
        last_seen: user.last_seen,
        created_at: user.created_at,
    }
}

pub fn chat_view(chat: &Chat, subscriber_count: i64) -> ChatView {
    ChatView {
        id: chat.id,
        name: chat.name.clone(),
        about: chat.about.clone(),
        creator_id: chat.creator_id,
        subscriber_count,
        created_at: chat.created_at,
    }
}
