//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! SeaORM persistence (entities, schema, unit of work, repositories) and
//! JWT/Argon2 authentication.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{BlogSession, DatabaseConfig};
