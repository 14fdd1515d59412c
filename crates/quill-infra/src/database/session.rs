//! Per-request session: one persistence context shared by all repositories.

use std::sync::Arc;

use sea_orm::DbConn;

use quill_core::error::RepoError;
use quill_core::ports::{
    CommentRepository, PostRepository, TagRepository, UnitOfWork, UserRepository,
};
use quill_core::ranking::ListBuilder;

use super::comments::SeaCommentRepository;
use super::context::BlogContext;
use super::posts::SeaPostRepository;
use super::tags::SeaTagRepository;
use super::users::SeaUserRepository;

/// Repositories bound to a single unit of work.
///
/// Writes made through any repository are flushed together by
/// [`BlogSession::commit`]. Not meant to be shared between requests.
pub struct BlogSession {
    context: Arc<BlogContext>,
    users: SeaUserRepository,
    posts: SeaPostRepository,
    tags: SeaTagRepository,
    comments: SeaCommentRepository,
}

impl BlogSession {
    pub fn new(db: Arc<DbConn>) -> Self {
        let context = Arc::new(BlogContext::new(db));
        Self {
            users: SeaUserRepository::new(context.clone()),
            posts: SeaPostRepository::new(context.clone()),
            tags: SeaTagRepository::new(context.clone()),
            comments: SeaCommentRepository::new(context.clone()),
            context,
        }
    }

    pub fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    pub fn posts(&self) -> &dyn PostRepository {
        &self.posts
    }

    pub fn tags(&self) -> &dyn TagRepository {
        &self.tags
    }

    pub fn comments(&self) -> &dyn CommentRepository {
        &self.comments
    }

    pub fn unit_of_work(&self) -> &dyn UnitOfWork {
        self.context.as_ref()
    }

    /// Ranked home page lists over this session's repositories.
    pub fn lists(&self) -> ListBuilder<'_> {
        ListBuilder::new(&self.posts, &self.tags)
    }

    /// Flush every staged change; returns the affected row count.
    pub async fn commit(&self) -> Result<u64, RepoError> {
        self.context.commit().await
    }
}
