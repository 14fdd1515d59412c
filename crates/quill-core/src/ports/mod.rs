//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod repository;
mod unit_of_work;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use repository::{
    CommentRepository, PostRepository, Repository, TagRepository, UserRepository,
};
pub use unit_of_work::{Change, EntityKind, Record, Tracked, UnitOfWork};
