//! Blog schema migrations, shared by the CLI and the server's startup
//! auto-migrate.

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_blog_schema;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_blog_schema::Migration)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::{ConnectOptions, Database};

    #[tokio::test]
    async fn test_up_then_down() {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1);
        let db = Database::connect(opts).await.unwrap();
        let manager = SchemaManager::new(&db);

        Migrator::up(&db, None).await.unwrap();
        for table in ["users", "posts", "tags", "post_tags", "comments", "post_reactions", "comment_reactions"] {
            assert!(manager.has_table(table).await.unwrap(), "missing {table}");
        }

        Migrator::down(&db, None).await.unwrap();
        assert!(!manager.has_table("posts").await.unwrap());
    }
}
