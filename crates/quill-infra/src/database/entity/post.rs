//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::PostStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(unique)]
    pub url: String,
    pub image: Option<String>,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub published_on: Option<DateTimeWithTimeZone>,
    pub scheduled_publish_time: Option<DateTimeWithTimeZone>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::post_reaction::Entity")]
    PostReaction,
    #[sea_orm(has_many = "super::post_tag::Entity")]
    PostTag,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::post_reaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostReaction.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_tag::Relation::Post.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for quill_core::domain::Post {
    fn from(model: Model) -> Self {
        let status = model.status.parse().unwrap_or_else(|_| {
            tracing::warn!(post_id = %model.id, status = %model.status, "Unknown post status, treating as draft");
            PostStatus::Draft
        });

        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            content: model.content,
            description: model.description,
            url: model.url,
            image: model.image,
            status,
            created_at: model.created_at.into(),
            published_on: model.published_on.map(Into::into),
            scheduled_publish_time: model.scheduled_publish_time.map(Into::into),
            is_active: model.is_active,
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<quill_core::domain::Post> for ActiveModel {
    fn from(post: quill_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            user_id: Set(post.user_id),
            title: Set(post.title),
            content: Set(post.content),
            description: Set(post.description),
            url: Set(post.url),
            image: Set(post.image),
            status: Set(post.status.as_str().to_string()),
            created_at: Set(post.created_at.into()),
            published_on: Set(post.published_on.map(Into::into)),
            scheduled_publish_time: Set(post.scheduled_publish_time.map(Into::into)),
            is_active: Set(post.is_active),
        }
    }
}
