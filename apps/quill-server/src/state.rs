//! Application state - shared across all handlers.

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{DbConn, DbErr};

use quill_core::ports::{PasswordService, TokenService};
use quill_infra::database::connect;
use quill_infra::{Argon2PasswordService, BlogSession, JwtTokenService};

use crate::config::{AppConfig, Environment};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbConn>,
    pub environment: Environment,
    pub cookie_secure: bool,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Connect to the store and bring its schema up to date.
    pub async fn new(config: &AppConfig) -> Result<Self, DbErr> {
        let db = connect(&config.database).await?;

        if config.database.auto_migrate {
            Migrator::up(&db, None).await?;
            tracing::info!("Database migrations applied");
        }

        let state = Self::with_connection(db, config);
        tracing::info!("Application state initialized");
        Ok(state)
    }

    pub fn with_connection(db: DbConn, config: &AppConfig) -> Self {
        Self {
            db: Arc::new(db),
            environment: config.environment,
            cookie_secure: config.cookie_secure,
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }

    /// A fresh unit of work over the shared pool.
    pub fn session(&self) -> BlogSession {
        BlogSession::new(self.db.clone())
    }
}
