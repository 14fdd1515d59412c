//! Database access: entities, schema, unit of work and repositories.

mod base;
mod comments;
mod connections;
mod context;
mod posts;
mod session;
mod tags;
mod users;

pub mod entity;
pub mod schema;

pub use base::SeaRepository;
pub use comments::SeaCommentRepository;
pub use connections::{DatabaseConfig, connect};
pub use context::BlogContext;
pub use posts::SeaPostRepository;
pub use session::BlogSession;
pub use tags::SeaTagRepository;
pub use users::SeaUserRepository;
