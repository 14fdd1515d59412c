use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A like (`is_like = true`) or dislike on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostReaction {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub is_like: bool,
    pub created_at: DateTime<Utc>,
}

impl PostReaction {
    pub fn new(post_id: Uuid, user_id: Uuid, is_like: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            is_like,
            created_at: Utc::now(),
        }
    }
}

/// A like or dislike on a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentReaction {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub user_id: Uuid,
    pub is_like: bool,
    pub created_at: DateTime<Utc>,
}

impl CommentReaction {
    pub fn new(comment_id: Uuid, user_id: Uuid, is_like: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            comment_id,
            user_id,
            is_like,
            created_at: Utc::now(),
        }
    }
}

/// What a reaction toggle should do given the caller's existing reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionToggle {
    /// No reaction yet: add one.
    Add,
    /// Same polarity clicked again: remove it.
    Remove,
    /// Opposite polarity: replace the existing reaction.
    Replace,
}

impl ReactionToggle {
    pub fn decide(existing: Option<bool>, is_like: bool) -> Self {
        match existing {
            None => ReactionToggle::Add,
            Some(current) if current == is_like => ReactionToggle::Remove,
            Some(_) => ReactionToggle::Replace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_decisions() {
        assert_eq!(ReactionToggle::decide(None, true), ReactionToggle::Add);
        assert_eq!(ReactionToggle::decide(Some(true), true), ReactionToggle::Remove);
        assert_eq!(ReactionToggle::decide(Some(false), false), ReactionToggle::Remove);
        assert_eq!(ReactionToggle::decide(Some(true), false), ReactionToggle::Replace);
    }
}
