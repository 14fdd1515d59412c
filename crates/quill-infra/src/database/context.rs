//! Persistence context - the SeaORM-backed unit of work.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, QueryFilter, Set, SqlErr, TransactionTrait,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use quill_core::error::RepoError;
use quill_core::ports::{Change, EntityKind, Record, UnitOfWork};

use super::entity::{comment, comment_reaction, post, post_reaction, post_tag, tag, user};

/// Holds the store connection and the changes staged by a session's
/// repositories. One context per request; never shared across requests.
pub struct BlogContext {
    db: Arc<DbConn>,
    staged: Mutex<Vec<Change>>,
}

impl BlogContext {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self {
            db,
            staged: Mutex::new(Vec::new()),
        }
    }

    /// Connection used for reads and immediate writes.
    pub fn connection(&self) -> &DbConn {
        &self.db
    }
}

#[async_trait]
impl UnitOfWork for BlogContext {
    async fn stage(&self, change: Change) {
        self.staged.lock().await.push(change);
    }

    async fn pending(&self) -> usize {
        self.staged.lock().await.len()
    }

    async fn discard(&self) {
        let mut staged = self.staged.lock().await;
        if !staged.is_empty() {
            tracing::debug!(discarded = staged.len(), "Discarding staged changes");
        }
        staged.clear();
    }

    async fn commit(&self) -> Result<u64, RepoError> {
        let mut staged = self.staged.lock().await;
        if staged.is_empty() {
            return Ok(0);
        }

        let txn = self.db.begin().await.map_err(repo_error)?;
        let mut affected = 0;
        for change in staged.iter() {
            affected += apply(&txn, change.clone()).await.map_err(|e| {
                tracing::warn!(error = %e, "Commit rejected by store, rolling back");
                repo_error(e)
            })?;
        }
        txn.commit().await.map_err(repo_error)?;

        tracing::debug!(changes = staged.len(), affected, "Changes committed");
        staged.clear();
        Ok(affected)
    }
}

async fn apply<C: ConnectionTrait>(db: &C, change: Change) -> Result<u64, DbErr> {
    match change {
        Change::Add(record) => match record {
            Record::User(v) => insert(db, user::ActiveModel::from(v)).await,
            Record::Post(v) => insert(db, post::ActiveModel::from(v)).await,
            Record::Tag(v) => insert(db, tag::ActiveModel::from(v)).await,
            Record::Comment(v) => insert(db, comment::ActiveModel::from(v)).await,
            Record::PostReaction(v) => insert(db, post_reaction::ActiveModel::from(v)).await,
            Record::CommentReaction(v) => {
                insert(db, comment_reaction::ActiveModel::from(v)).await
            }
        },
        Change::Update(record) => match record {
            Record::User(v) => update(db, user::ActiveModel::from(v)).await,
            Record::Post(v) => update(db, post::ActiveModel::from(v)).await,
            Record::Tag(v) => update(db, tag::ActiveModel::from(v)).await,
            Record::Comment(v) => update(db, comment::ActiveModel::from(v)).await,
            Record::PostReaction(v) => update(db, post_reaction::ActiveModel::from(v)).await,
            Record::CommentReaction(v) => {
                update(db, comment_reaction::ActiveModel::from(v)).await
            }
        },
        Change::Delete { kind, id } => match kind {
            EntityKind::User => delete::<user::Entity, _>(db, id).await,
            EntityKind::Post => delete::<post::Entity, _>(db, id).await,
            EntityKind::Tag => delete::<tag::Entity, _>(db, id).await,
            EntityKind::Comment => delete::<comment::Entity, _>(db, id).await,
            EntityKind::PostReaction => delete::<post_reaction::Entity, _>(db, id).await,
            EntityKind::CommentReaction => delete::<comment_reaction::Entity, _>(db, id).await,
        },
        Change::SetPostTags { post_id, tag_ids } => replace_post_tags(db, post_id, tag_ids).await,
    }
}

async fn insert<A, C>(db: &C, model: A) -> Result<u64, DbErr>
where
    A: ActiveModelTrait + Send,
    C: ConnectionTrait,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    A::Entity::insert(model).exec_without_returning(db).await
}

async fn update<A, C>(db: &C, model: A) -> Result<u64, DbErr>
where
    A: ActiveModelTrait + Send,
    C: ConnectionTrait,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    match A::Entity::update(model).exec(db).await {
        Ok(_) => Ok(1),
        Err(DbErr::RecordNotUpdated) => Ok(0),
        Err(e) => Err(e),
    }
}

async fn delete<E, C>(db: &C, id: Uuid) -> Result<u64, DbErr>
where
    E: EntityTrait,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = Uuid>,
    C: ConnectionTrait,
{
    Ok(E::delete_by_id(id).exec(db).await?.rows_affected)
}

async fn replace_post_tags<C: ConnectionTrait>(
    db: &C,
    post_id: Uuid,
    tag_ids: Vec<Uuid>,
) -> Result<u64, DbErr> {
    let removed = post_tag::Entity::delete_many()
        .filter(post_tag::Column::PostId.eq(post_id))
        .exec(db)
        .await?
        .rows_affected;

    // Duplicates would collide on the composite key.
    let unique: BTreeSet<Uuid> = tag_ids.into_iter().collect();
    if unique.is_empty() {
        return Ok(removed);
    }

    let links = unique.into_iter().map(|tag_id| post_tag::ActiveModel {
        post_id: Set(post_id),
        tag_id: Set(tag_id),
    });
    let added = post_tag::Entity::insert_many(links)
        .exec_without_returning(db)
        .await?;

    Ok(removed + added)
}

/// Classify a SeaORM error for callers of the repository layer.
pub(crate) fn repo_error(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => return RepoError::Constraint(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => return RepoError::Constraint(msg),
        _ => {}
    }

    let err_str = err.to_string();
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(err_str),
        _ if err_str.contains("duplicate") || err_str.contains("UNIQUE") => {
            RepoError::Constraint(err_str)
        }
        _ => RepoError::Query(err_str),
    }
}
