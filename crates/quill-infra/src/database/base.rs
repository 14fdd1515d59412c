use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DbConn, EntityTrait, PrimaryKeyTrait};
use uuid::Uuid;

use quill_core::error::RepoError;
use quill_core::ports::{Change, Repository, Tracked, UnitOfWork};

use super::context::{BlogContext, repo_error};

/// Generic SeaORM repository. Reads hit the store directly, writes are
/// staged on the shared [`BlogContext`].
pub struct SeaRepository<E>
where
    E: EntityTrait,
{
    pub(crate) context: Arc<BlogContext>,
    _entity: PhantomData<E>,
}

impl<E> SeaRepository<E>
where
    E: EntityTrait,
{
    pub fn new(context: Arc<BlogContext>) -> Self {
        Self {
            context,
            _entity: PhantomData,
        }
    }

    pub(crate) fn db(&self) -> &DbConn {
        self.context.connection()
    }
}

#[async_trait]
impl<E, T> Repository<T> for SeaRepository<E>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = Uuid>,
    T: Tracked + From<E::Model>,
{
    async fn get_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id)
            .one(self.db())
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn get_all(&self) -> Result<Vec<T>, RepoError> {
        let rows = E::find().all(self.db()).await.map_err(repo_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn add(&self, entity: T) {
        self.context.stage(Change::Add(entity.into_record())).await;
    }

    async fn update(&self, entity: T) {
        self.context
            .stage(Change::Update(entity.into_record()))
            .await;
    }

    async fn delete(&self, entity: &T) {
        self.context
            .stage(Change::Delete {
                kind: T::KIND,
                id: entity.id(),
            })
            .await;
    }
}
