use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CommentReaction, User};

/// Comment entity. Replies point at their parent through `parent_comment_id`;
/// threading is one level deep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub parent_comment_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub published_on: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Comment {
    /// Create a comment that is published immediately.
    pub fn new(post_id: Uuid, user_id: Uuid, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            parent_comment_id: None,
            content,
            created_at: now,
            published_on: Some(now),
            is_active: true,
        }
    }

    pub fn reply_to(mut self, parent_id: Uuid) -> Self {
        self.parent_comment_id = Some(parent_id);
        self
    }

    pub fn is_reply(&self) -> bool {
        self.parent_comment_id.is_some()
    }
}

/// A comment with its author and reactions.
#[derive(Debug, Clone, Serialize)]
pub struct CommentDetails {
    pub comment: Comment,
    pub author: Option<User>,
    pub reactions: Vec<CommentReaction>,
}

impl CommentDetails {
    pub fn like_count(&self) -> usize {
        self.reactions.iter().filter(|r| r.is_like).count()
    }

    pub fn dislike_count(&self) -> usize {
        self.reactions.iter().filter(|r| !r.is_like).count()
    }
}
