//! Schema derived from the SeaORM entities.
//!
//! Tables are listed parents first so foreign keys always resolve. The
//! migrator and the test harness both build the schema from here.

use sea_orm::sea_query::{Index, IndexCreateStatement, TableCreateStatement};
use sea_orm::{ConnectionTrait, DbBackend, DbErr, Schema};

use super::entity::{comment, comment_reaction, post, post_reaction, post_tag, tag, user};

/// `CREATE TABLE` statements for every entity, in dependency order.
pub fn table_statements(backend: DbBackend) -> Vec<TableCreateStatement> {
    let schema = Schema::new(backend);
    vec![
        schema
            .create_table_from_entity(user::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(tag::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(post::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(post_tag::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(comment::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(post_reaction::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(comment_reaction::Entity)
            .if_not_exists()
            .to_owned(),
    ]
}

/// One reaction per user per post and per comment.
pub fn index_statements() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("ux_post_reactions_post_user")
            .table(post_reaction::Entity)
            .col(post_reaction::Column::PostId)
            .col(post_reaction::Column::UserId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("ux_comment_reactions_comment_user")
            .table(comment_reaction::Entity)
            .col(comment_reaction::Column::CommentId)
            .col(comment_reaction::Column::UserId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("ix_comments_parent")
            .table(comment::Entity)
            .col(comment::Column::ParentCommentId)
            .if_not_exists()
            .to_owned(),
    ]
}

/// Create every table and index on `db` if missing.
pub async fn create_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    for statement in table_statements(backend) {
        db.execute(backend.build(&statement)).await?;
    }
    for statement in index_statements() {
        db.execute(backend.build(&statement)).await?;
    }

    tracing::debug!(?backend, "Schema ensured");
    Ok(())
}
