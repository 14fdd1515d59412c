//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use quill_core::domain::{
    Comment, CommentDetails, Post, PostDetails, Tag, TagDetails, User,
};

use crate::validation::{validate_color, validate_slug};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// Author summary embedded in post and comment responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub username: String,
}

impl From<User> for AuthorResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// Request to create a post. New posts start as drafts unless `status` says
/// otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,

    /// Slug; derived from the title when omitted.
    #[validate(
        length(min = 5, max = 200, message = "URL must be 5-200 characters"),
        custom(function = "validate_slug")
    )]
    pub url: Option<String>,

    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,

    pub status: Option<String>,

    pub scheduled_publish_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

/// Request to update a post. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(
        length(min = 5, max = 200, message = "URL must be 5-200 characters"),
        custom(function = "validate_slug")
    )]
    pub url: Option<String>,

    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,

    pub status: Option<String>,

    pub scheduled_publish_time: Option<DateTime<Utc>>,

    pub is_active: Option<bool>,

    /// Replaces the post's tag set when present.
    pub tag_ids: Option<Vec<Uuid>>,
}

/// Query parameters for post search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Post without its aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub description: String,
    pub url: String,
    pub image: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub published_on: Option<DateTime<Utc>>,
    pub scheduled_publish_time: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            title: post.title,
            content: post.content,
            description: post.description,
            url: post.url,
            image: post.image,
            status: post.status.to_string(),
            created_at: post.created_at,
            published_on: post.published_on,
            scheduled_publish_time: post.scheduled_publish_time,
            is_active: post.is_active,
        }
    }
}

/// Post with author, tags and reaction/comment counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailsResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub author: Option<AuthorResponse>,
    pub tags: Vec<TagResponse>,
    pub like_count: usize,
    pub dislike_count: usize,
    pub comment_count: usize,
}

impl From<PostDetails> for PostDetailsResponse {
    fn from(details: PostDetails) -> Self {
        let like_count = details.like_count();
        let dislike_count = details.dislike_count();
        let comment_count = details.comment_count();
        Self {
            post: details.post.into(),
            author: details.author.map(Into::into),
            tags: details.tags.into_iter().map(Into::into).collect(),
            like_count,
            dislike_count,
            comment_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,

    /// Slug; derived from the name when omitted.
    #[validate(
        length(min = 1, max = 50, message = "URL must be 1-50 characters"),
        custom(function = "validate_slug")
    )]
    pub url: Option<String>,

    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTagRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: Option<String>,

    #[validate(
        length(min = 1, max = 50, message = "URL must be 1-50 characters"),
        custom(function = "validate_slug")
    )]
    pub url: Option<String>,

    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub color: String,
    pub is_active: bool,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            url: tag.url,
            color: tag.color,
            is_active: tag.is_active,
        }
    }
}

/// Tag with the number of posts carrying it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCountResponse {
    #[serde(flatten)]
    pub tag: TagResponse,
    pub post_count: usize,
}

impl From<TagDetails> for TagCountResponse {
    fn from(details: TagDetails) -> Self {
        let post_count = details.post_count();
        Self {
            tag: details.tag.into(),
            post_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 1000, message = "Comment must be 1-1000 characters"))]
    pub content: String,

    /// Comment being replied to; must belong to the same post.
    pub parent_comment_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 1000, message = "Comment must be 1-1000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub parent_comment_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub published_on: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            parent_comment_id: comment.parent_comment_id,
            content: comment.content,
            created_at: comment.created_at,
            published_on: comment.published_on,
            is_active: comment.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDetailsResponse {
    #[serde(flatten)]
    pub comment: CommentResponse,
    pub author: Option<AuthorResponse>,
    pub like_count: usize,
    pub dislike_count: usize,
}

impl From<CommentDetails> for CommentDetailsResponse {
    fn from(details: CommentDetails) -> Self {
        let like_count = details.like_count();
        let dislike_count = details.dislike_count();
        Self {
            comment: details.comment.into(),
            author: details.author.map(Into::into),
            like_count,
            dislike_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Reactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionRequest {
    pub is_like: bool,
}

/// The caller's reaction after a toggle; `None` when it was removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionResponse {
    pub is_like: Option<bool>,
}
