use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Comment, PostReaction, Tag, User};
use crate::error::DomainError;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PostStatus {
    #[default]
    Draft,
    Scheduled,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "Draft",
            PostStatus::Scheduled => "Scheduled",
            PostStatus::Published => "Published",
            PostStatus::Archived => "Archived",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "scheduled" => Ok(PostStatus::Scheduled),
            "published" => Ok(PostStatus::Published),
            "archived" => Ok(PostStatus::Archived),
            other => Err(DomainError::Validation(format!(
                "Unknown post status '{}'",
                other
            ))),
        }
    }
}

/// Post entity - represents a blog post or article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub description: String,
    /// URL slug, unique across posts.
    pub url: String,
    pub image: Option<String>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub published_on: Option<DateTime<Utc>>,
    pub scheduled_publish_time: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Post {
    /// Create a new active draft.
    pub fn new(
        user_id: Uuid,
        title: String,
        content: String,
        description: String,
        url: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            content,
            description,
            url,
            image: None,
            status: PostStatus::Draft,
            created_at: Utc::now(),
            published_on: None,
            scheduled_publish_time: None,
            is_active: true,
        }
    }

    /// Active and published; the only posts eligible for ranked lists.
    pub fn is_live(&self) -> bool {
        self.is_active && self.status == PostStatus::Published
    }

    /// Move the post to `status`, keeping `published_on` consistent with it.
    ///
    /// Scheduling requires a publish time, either passed in or already set.
    pub fn transition(
        &mut self,
        status: PostStatus,
        scheduled_for: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        match status {
            PostStatus::Draft => {
                self.published_on = None;
                self.scheduled_publish_time = None;
            }
            PostStatus::Scheduled => {
                let when = scheduled_for
                    .or(self.scheduled_publish_time)
                    .ok_or_else(|| {
                        DomainError::Validation(
                            "A scheduled post needs a publish time".to_string(),
                        )
                    })?;
                self.scheduled_publish_time = Some(when);
                self.published_on = Some(when);
            }
            PostStatus::Published => {
                self.published_on = self.published_on.or(Some(now));
                self.scheduled_publish_time = None;
            }
            PostStatus::Archived => {}
        }
        self.status = status;
        Ok(())
    }
}

/// A post together with the aggregates needed to present it.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetails {
    pub post: Post,
    pub author: Option<User>,
    pub tags: Vec<Tag>,
    pub comments: Vec<Comment>,
    pub reactions: Vec<PostReaction>,
}

impl PostDetails {
    pub fn like_count(&self) -> usize {
        self.reactions.iter().filter(|r| r.is_like).count()
    }

    pub fn dislike_count(&self) -> usize {
        self.reactions.iter().filter(|r| !r.is_like).count()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}
