//! Comment reaction entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comment_reactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub comment_id: Uuid,
    pub user_id: Uuid,
    pub is_like: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::comment::Entity",
        from = "Column::CommentId",
        to = "super::comment::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Comment,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for quill_core::domain::CommentReaction {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            comment_id: model.comment_id,
            user_id: model.user_id,
            is_like: model.is_like,
            created_at: model.created_at.into(),
        }
    }
}

impl From<quill_core::domain::CommentReaction> for ActiveModel {
    fn from(reaction: quill_core::domain::CommentReaction) -> Self {
        Self {
            id: Set(reaction.id),
            comment_id: Set(reaction.comment_id),
            user_id: Set(reaction.user_id),
            is_like: Set(reaction.is_like),
            created_at: Set(reaction.created_at.into()),
        }
    }
}
