use sea_orm_migration::prelude::*;

use quill_infra::database::entity::{
    comment, comment_reaction, post, post_reaction, post_tag, tag, user,
};
use quill_infra::database::schema::{index_statements, table_statements};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        for table in table_statements(backend) {
            manager.create_table(table).await?;
        }
        for index in index_statements() {
            manager.create_index(index).await?;
        }

        tracing::info!("Blog schema created");
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children first.
        manager
            .drop_table(Table::drop().table(comment_reaction::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(post_reaction::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(comment::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(post_tag::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(post::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(tag::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(user::Entity).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
