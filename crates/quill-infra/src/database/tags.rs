//! Tag repository.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use quill_core::domain::{Tag, TagDetails};
use quill_core::error::RepoError;
use quill_core::ports::TagRepository;

use super::base::SeaRepository;
use super::context::repo_error;
use super::entity::post;
use super::entity::post_tag;
use super::entity::tag::{self, Entity as TagEntity};

/// SeaORM tag repository.
pub type SeaTagRepository = SeaRepository<TagEntity>;

#[async_trait]
impl TagRepository for SeaTagRepository {
    async fn get_by_url(&self, url: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Url.eq(url))
            .one(self.db())
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Name.eq(name))
            .one(self.db())
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn get_all_with_posts(&self) -> Result<Vec<TagDetails>, RepoError> {
        let tags = TagEntity::find()
            .all(self.db())
            .await
            .map_err(repo_error)?;
        let links = post_tag::Entity::find()
            .all(self.db())
            .await
            .map_err(repo_error)?;

        let mut posts_by_tag: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for link in links {
            posts_by_tag.entry(link.tag_id).or_default().push(link.post_id);
        }

        Ok(tags
            .into_iter()
            .map(|model| {
                let post_ids = posts_by_tag.remove(&model.id).unwrap_or_default();
                TagDetails {
                    tag: model.into(),
                    post_ids,
                }
            })
            .collect())
    }

    async fn get_by_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .inner_join(post::Entity)
            .filter(post::Column::Id.eq(post_id))
            .order_by_asc(tag::Column::Name)
            .all(self.db())
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn name_exists(&self, name: &str) -> Result<bool, RepoError> {
        let count = TagEntity::find()
            .filter(tag::Column::Name.eq(name))
            .count(self.db())
            .await
            .map_err(repo_error)?;

        Ok(count > 0)
    }

    async fn url_exists(&self, url: &str) -> Result<bool, RepoError> {
        let count = TagEntity::find()
            .filter(tag::Column::Url.eq(url))
            .count(self.db())
            .await
            .map_err(repo_error)?;

        Ok(count > 0)
    }
}
