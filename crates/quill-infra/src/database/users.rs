//! User repository.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use quill_core::domain::User;
use quill_core::error::RepoError;
use quill_core::ports::UserRepository;

use super::base::SeaRepository;
use super::context::repo_error;
use super::entity::user::{self, Entity as UserEntity};

/// SeaORM user repository.
pub type SeaUserRepository = SeaRepository<UserEntity>;

/// Mask an email for logging to avoid PII in logs.
pub(crate) fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let masked_local = match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{}***", first),
            _ => "***".to_string(),
        };
        format!("{}{}", masked_local, domain)
    } else {
        "***".to_string()
    }
}

#[async_trait]
impl UserRepository for SeaUserRepository {
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db())
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db())
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepoError> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(self.db())
            .await
            .map_err(repo_error)?;

        Ok(count > 0)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, RepoError> {
        let count = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .count(self.db())
            .await
            .map_err(repo_error)?;

        Ok(count > 0)
    }
}
