//! Ownership rules for editing and deleting forum content.

use crate::domain::entities::{Chat, Comment, Post};

/// Domain service deciding who may change what.
pub struct ModerationService;

impl ModerationService {
    /// Only the creator of a chat may edit its description.
    pub fn can_edit_chat(user_id: i64, chat: &Chat) -> bool {
        chat.is_creator(user_id)
    }

    /// A post may be deleted by its author or by the creator of its chat.
    pub fn can_delete_post(user_id: i64, post: &Post, chat: &Chat) -> bool {
        debug_assert_eq!(post.chat_id, chat.id);
        post.is_author(user_id) || chat.is_creator(user_id)
    }

    /// A reply must stay on the same post as its parent.
    pub fn is_valid_parent(post_id: i64, parent: &Comment) -> bool {
        parent.post_id == post_id
    }
}
