//! Post Service
//!
//! Post pages, comments, post creation with an optional image, deletion and
//! the popular listing.

use std::sync::Arc;

use async_trait::async_trait;

use super::views::ViewBuilder;
use crate::application::dto::response::{CommentView, PostView};
use crate::domain::services::ModerationService;
use crate::domain::{
    Chat, ChatRepository, Comment, CommentRepository, NewComment, NewPost, Page, PageRequest,
    Post, PostRepository,
};
use crate::infrastructure::metrics::{record_forum_action, ForumAction};
use crate::infrastructure::storage::ImageStore;
use crate::shared::error::AppError;
use crate::shared::validation::is_image_filename;

/// An image file received with a new post.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Everything the post page shows.
#[derive(Debug)]
pub struct PostPage {
    pub post: PostView,
    pub can_delete: bool,
    pub comments: Page<CommentView>,
}

/// Input for a new post.
#[derive(Debug, Clone)]
pub struct MakePost {
    pub chat_name: String,
    pub title: String,
    pub body: String,
    pub image: Option<UploadedImage>,
}

/// Post service trait
#[async_trait]
pub trait PostService: Send + Sync {
    async fn get(&self, post_id: i64) -> Result<Post, PostError>;

    /// Post details and one page of its comments, newest first
    async fn post_page(
        &self,
        post_id: i64,
        viewer_id: Option<i64>,
        page: PageRequest,
    ) -> Result<PostPage, PostError>;

    /// Comment on a post; anonymous when `author_id` is `None`
    async fn add_comment(
        &self,
        post_id: i64,
        author_id: Option<i64>,
        body: &str,
        parent_id: Option<i64>,
    ) -> Result<Comment, PostError>;

    /// Create a post in the named chat, storing the image first if any
    async fn make_post(&self, author_id: i64, input: MakePost) -> Result<(Post, Chat), PostError>;

    /// Delete a post as its author or its chat's creator
    async fn delete(&self, user_id: i64, post_id: i64) -> Result<Chat, PostError>;

    /// Posts ordered by score, optionally filtered on title or body
    async fn popular(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<PostView>, PostError>;
}

/// Post service errors
#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("Post {0} not found.")]
    NotFound(i64),

    #[error("Not a valid choice")]
    UnknownChat(String),

    #[error("Image Only!")]
    NotAnImage,

    #[error("Parent comment not found")]
    ParentNotFound(i64),

    #[error("Parent comment belongs to another post")]
    ParentOnOtherPost(i64),

    #[error("You cannot delete this post.")]
    NotAllowed,

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<PostError> for AppError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::NotFound(_) => AppError::NotFound(err.to_string()),
            PostError::UnknownChat(_) => AppError::field("chat_name", err.to_string()),
            PostError::NotAnImage => AppError::field("image", err.to_string()),
            PostError::ParentNotFound(_) | PostError::ParentOnOtherPost(_) => {
                AppError::field("parent_id", err.to_string())
            }
            PostError::NotAllowed => AppError::Forbidden(err.to_string()),
            PostError::Repository(e) => e,
        }
    }
}

/// PostService implementation
pub struct PostServiceImpl {
    post_repo: Arc<dyn PostRepository>,
    chat_repo: Arc<dyn ChatRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    images: Arc<dyn ImageStore>,
    views: ViewBuilder,
}

impl PostServiceImpl {
    pub fn new(
        post_repo: Arc<dyn PostRepository>,
        chat_repo: Arc<dyn ChatRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        images: Arc<dyn ImageStore>,
        views: ViewBuilder,
    ) -> Self {
        Self {
            post_repo,
            chat_repo,
            comment_repo,
            images,
            views,
        }
    }

    async fn chat_of(&self, post: &Post) -> Result<Chat, PostError> {
        self.chat_repo.find_by_id(post.chat_id).await?.ok_or_else(|| {
            AppError::Internal(format!("Post {} references missing chat", post.id)).into()
        })
    }
}

#[async_trait]
impl PostService for PostServiceImpl {
    async fn get(&self, post_id: i64) -> Result<Post, PostError> {
        self.post_repo
            .find_by_id(post_id)
            .await?
            .ok_or(PostError::NotFound(post_id))
    }

    async fn post_page(
        &self,
        post_id: i64,
        viewer_id: Option<i64>,
        page: PageRequest,
    ) -> Result<PostPage, PostError> {
        let post = self.get(post_id).await?;

        let can_delete = match viewer_id {
            Some(user_id) => {
                let chat = self.chat_of(&post).await?;
                ModerationService::can_delete_post(user_id, &post, &chat)
            }
            None => false,
        };

        let comments = self.comment_repo.list_by_post(post.id, page).await?;
        let comments = Page::from_overfetch(comments, page);
        let items = self.views.comments(&comments.items).await?;

        Ok(PostPage {
            post: self.views.post(&post).await?,
            can_delete,
            comments: comments.with_items(items),
        })
    }

    async fn add_comment(
        &self,
        post_id: i64,
        author_id: Option<i64>,
        body: &str,
        parent_id: Option<i64>,
    ) -> Result<Comment, PostError> {
        let post = self.get(post_id).await?;

        if let Some(parent_id) = parent_id {
            let parent = self
                .comment_repo
                .find_by_id(parent_id)
                .await?
                .ok_or(PostError::ParentNotFound(parent_id))?;
            if !ModerationService::is_valid_parent(post.id, &parent) {
                return Err(PostError::ParentOnOtherPost(parent_id));
            }
        }

        let comment = self
            .comment_repo
            .create(&NewComment {
                body: body.to_string(),
                author_id,
                post_id: post.id,
                parent_id,
            })
            .await?;

        record_forum_action(ForumAction::CommentCreated);
        tracing::info!(
            comment_id = comment.id,
            post_id = post.id,
            author_id = ?author_id,
            "Comment created"
        );
        Ok(comment)
    }

    async fn make_post(&self, author_id: i64, input: MakePost) -> Result<(Post, Chat), PostError> {
        let chat = self
            .chat_repo
            .find_by_name(&input.chat_name)
            .await?
            .ok_or_else(|| PostError::UnknownChat(input.chat_name.clone()))?;

        if let Some(upload) = &input.image {
            if !is_image_filename(&upload.filename) {
                return Err(PostError::NotAnImage);
            }
        }

        let stored = match &input.image {
            Some(upload) => Some(self.images.save(&upload.filename, &upload.bytes).await?),
            None => None,
        };

        let new_post = NewPost {
            title: input.title,
            body: input.body,
            author_id,
            chat_id: chat.id,
        };

        let post = match self.post_repo.create(&new_post, stored.as_ref()).await {
            Ok(post) => post,
            Err(e) => {
                if let Some(image) = &stored {
                    if let Err(remove_err) = self.images.remove(&image.filename).await {
                        tracing::warn!(error = %remove_err, file = %image.filename, "Failed to remove orphaned image");
                    }
                }
                return Err(e.into());
            }
        };

        record_forum_action(ForumAction::PostCreated);
        tracing::info!(
            post_id = post.id,
            chat_id = chat.id,
            author_id,
            has_image = stored.is_some(),
            "Post created"
        );
        Ok((post, chat))
    }

    async fn delete(&self, user_id: i64, post_id: i64) -> Result<Chat, PostError> {
        let post = self.get(post_id).await?;
        let chat = self.chat_of(&post).await?;

        if !ModerationService::can_delete_post(user_id, &post, &chat) {
            return Err(PostError::NotAllowed);
        }

        if let Some(image) = self.post_repo.delete(post.id).await? {
            if let Err(e) = self.images.remove(&image.filename).await {
                tracing::warn!(error = %e, file = %image.filename, "Failed to remove post image");
            }
        }

        record_forum_action(ForumAction::PostDeleted);
        tracing::info!(post_id, user_id, chat_id = chat.id, "Post deleted");
        Ok(chat)
    }

    async fn popular(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<PostView>, PostError> {
        let rows = self.post_repo.popular(search, page).await?;
        let rows = Page::from_overfetch(rows, page);
        let posts: Vec<Post> = rows.items.iter().map(|row| row.post.clone()).collect();
        let items = self.views.posts(&posts).await?;

        Ok(rows.with_items(items))
    }
}
