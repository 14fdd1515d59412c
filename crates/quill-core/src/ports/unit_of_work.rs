//! Unit of work port - explicit staging of writes with a single commit point.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, CommentReaction, Post, PostReaction, Tag, User};
use crate::error::RepoError;

/// Kinds of persisted entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Post,
    Tag,
    Comment,
    PostReaction,
    CommentReaction,
}

/// A full entity value carried by a staged add or update.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    User(User),
    Post(Post),
    Tag(Tag),
    Comment(Comment),
    PostReaction(PostReaction),
    CommentReaction(CommentReaction),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::User(_) => EntityKind::User,
            Record::Post(_) => EntityKind::Post,
            Record::Tag(_) => EntityKind::Tag,
            Record::Comment(_) => EntityKind::Comment,
            Record::PostReaction(_) => EntityKind::PostReaction,
            Record::CommentReaction(_) => EntityKind::CommentReaction,
        }
    }
}

/// Entities that can be staged in a unit of work.
pub trait Tracked: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> Uuid;

    fn into_record(self) -> Record;
}

macro_rules! tracked {
    ($ty:ident) => {
        impl Tracked for $ty {
            const KIND: EntityKind = EntityKind::$ty;

            fn id(&self) -> Uuid {
                self.id
            }

            fn into_record(self) -> Record {
                Record::$ty(self)
            }
        }
    };
}

tracked!(User);
tracked!(Post);
tracked!(Tag);
tracked!(Comment);
tracked!(PostReaction);
tracked!(CommentReaction);

/// A pending write.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Add(Record),
    /// Overwrite every scalar field of the stored row with this value.
    Update(Record),
    Delete { kind: EntityKind, id: Uuid },
    /// Replace the full tag set of a post.
    SetPostTags { post_id: Uuid, tag_ids: Vec<Uuid> },
}

/// Unit of work - collects changes and flushes them in one transaction.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Append a change to the pending list.
    async fn stage(&self, change: Change);

    /// Number of changes waiting for commit.
    async fn pending(&self) -> usize;

    /// Drop all pending changes.
    async fn discard(&self);

    /// Apply all pending changes in staging order as one transaction and
    /// return the number of affected rows. On failure nothing is applied and
    /// the pending changes are kept.
    async fn commit(&self) -> Result<u64, RepoError>;
}
