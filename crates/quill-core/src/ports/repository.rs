use async_trait::async_trait;
use uuid::Uuid;

use super::unit_of_work::Tracked;
use crate::domain::{
    Comment, CommentDetails, CommentReaction, Post, PostDetails, PostReaction, Tag, TagDetails,
    User,
};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
///
/// Reads go straight to the store. Writes are staged on the session's unit of
/// work and only reach the store on commit.
#[async_trait]
pub trait Repository<T: Tracked>: Send + Sync {
    /// Find an entity by its ID.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError>;

    /// Every stored entity, in storage order.
    async fn get_all(&self) -> Result<Vec<T>, RepoError>;

    /// Stage an insert.
    async fn add(&self, entity: T);

    /// Stage a full-value overwrite of the stored entity with the same ID.
    async fn update(&self, entity: T);

    /// Stage a delete.
    async fn delete(&self, entity: &T);
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: Repository<User> {
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn email_exists(&self, email: &str) -> Result<bool, RepoError>;

    async fn username_exists(&self, username: &str) -> Result<bool, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: Repository<Post> {
    async fn get_by_url(&self, url: &str) -> Result<Option<Post>, RepoError>;

    async fn get_by_id_with_details(&self, id: Uuid) -> Result<Option<PostDetails>, RepoError>;

    async fn get_by_url_with_details(&self, url: &str)
    -> Result<Option<PostDetails>, RepoError>;

    /// All posts with author, tags, comments and reactions loaded.
    async fn get_all_with_details(&self) -> Result<Vec<PostDetails>, RepoError>;

    async fn get_by_user(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError>;

    async fn get_by_tag(&self, tag_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Case-insensitive substring match over title, content and description.
    async fn search(&self, term: &str) -> Result<Vec<Post>, RepoError>;

    async fn url_exists(&self, url: &str) -> Result<bool, RepoError>;

    /// Stage replacing the post's tag set.
    async fn set_tags(&self, post_id: Uuid, tag_ids: Vec<Uuid>);

    async fn get_reaction(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<PostReaction>, RepoError>;

    /// Insert a reaction and commit it immediately, independent of staged changes.
    async fn add_reaction(&self, reaction: &PostReaction) -> Result<(), RepoError>;

    /// Delete a reaction and commit it immediately, independent of staged changes.
    async fn remove_reaction(&self, reaction: &PostReaction) -> Result<(), RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: Repository<Tag> {
    async fn get_by_url(&self, url: &str) -> Result<Option<Tag>, RepoError>;

    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError>;

    /// All tags with the ids of the posts carrying them.
    async fn get_all_with_posts(&self) -> Result<Vec<TagDetails>, RepoError>;

    async fn get_by_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError>;

    async fn name_exists(&self, name: &str) -> Result<bool, RepoError>;

    async fn url_exists(&self, url: &str) -> Result<bool, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: Repository<Comment> {
    async fn get_all_with_details(&self) -> Result<Vec<CommentDetails>, RepoError>;

    async fn get_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn get_by_post_with_details(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<CommentDetails>, RepoError>;

    async fn get_by_user(&self, user_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// Direct replies to `parent_id` only.
    async fn get_replies_by_parent_id(&self, parent_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn get_reaction(
        &self,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<CommentReaction>, RepoError>;

    async fn add_reaction(&self, reaction: &CommentReaction) -> Result<(), RepoError>;

    async fn remove_reaction(&self, reaction: &CommentReaction) -> Result<(), RepoError>;
}
