//! Comment repository, including comment reactions.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use quill_core::domain::{Comment, CommentDetails, CommentReaction, User};
use quill_core::error::RepoError;
use quill_core::ports::CommentRepository;

use super::base::SeaRepository;
use super::context::repo_error;
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::{comment_reaction, user};

/// SeaORM comment repository.
pub type SeaCommentRepository = SeaRepository<CommentEntity>;

impl SeaCommentRepository {
    async fn with_details(
        &self,
        comments: Vec<comment::Model>,
    ) -> Result<Vec<CommentDetails>, RepoError> {
        if comments.is_empty() {
            return Ok(Vec::new());
        }
        let db = self.db();
        let comment_ids: Vec<Uuid> = comments.iter().map(|c| c.id).collect();
        let author_ids: BTreeSet<Uuid> = comments.iter().map(|c| c.user_id).collect();

        let authors: HashMap<Uuid, User> = user::Entity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(db)
            .await
            .map_err(repo_error)?
            .into_iter()
            .map(|m| (m.id, User::from(m)))
            .collect();

        let mut reactions: HashMap<Uuid, Vec<CommentReaction>> = HashMap::new();
        for model in comment_reaction::Entity::find()
            .filter(comment_reaction::Column::CommentId.is_in(comment_ids))
            .all(db)
            .await
            .map_err(repo_error)?
        {
            reactions.entry(model.comment_id).or_default().push(model.into());
        }

        Ok(comments
            .into_iter()
            .map(|model| {
                let comment: Comment = model.into();
                CommentDetails {
                    author: authors.get(&comment.user_id).cloned(),
                    reactions: reactions.remove(&comment.id).unwrap_or_default(),
                    comment,
                }
            })
            .collect())
    }

    async fn find_where(
        &self,
        column: comment::Column,
        id: Uuid,
    ) -> Result<Vec<comment::Model>, RepoError> {
        CommentEntity::find()
            .filter(column.eq(id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(self.db())
            .await
            .map_err(repo_error)
    }
}

#[async_trait]
impl CommentRepository for SeaCommentRepository {
    async fn get_all_with_details(&self) -> Result<Vec<CommentDetails>, RepoError> {
        let comments = CommentEntity::find()
            .all(self.db())
            .await
            .map_err(repo_error)?;

        self.with_details(comments).await
    }

    async fn get_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let rows = self.find_where(comment::Column::PostId, post_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_by_post_with_details(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<CommentDetails>, RepoError> {
        let rows = self.find_where(comment::Column::PostId, post_id).await?;
        self.with_details(rows).await
    }

    async fn get_by_user(&self, user_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let rows = self.find_where(comment::Column::UserId, user_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_replies_by_parent_id(&self, parent_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let rows = self
            .find_where(comment::Column::ParentCommentId, parent_id)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_reaction(
        &self,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<CommentReaction>, RepoError> {
        let result = comment_reaction::Entity::find()
            .filter(comment_reaction::Column::CommentId.eq(comment_id))
            .filter(comment_reaction::Column::UserId.eq(user_id))
            .one(self.db())
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn add_reaction(&self, reaction: &CommentReaction) -> Result<(), RepoError> {
        comment_reaction::Entity::insert(comment_reaction::ActiveModel::from(reaction.clone()))
            .exec_without_returning(self.db())
            .await
            .map_err(repo_error)?;

        tracing::debug!(comment_id = %reaction.comment_id, is_like = reaction.is_like, "Comment reaction added");
        Ok(())
    }

    async fn remove_reaction(&self, reaction: &CommentReaction) -> Result<(), RepoError> {
        comment_reaction::Entity::delete_by_id(reaction.id)
            .exec(self.db())
            .await
            .map_err(repo_error)?;

        tracing::debug!(comment_id = %reaction.comment_id, "Comment reaction removed");
        Ok(())
    }
}
