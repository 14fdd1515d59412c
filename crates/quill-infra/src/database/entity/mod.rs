//! SeaORM entities. Each module converts to and from its domain type.

pub mod comment;
pub mod comment_reaction;
pub mod post;
pub mod post_reaction;
pub mod post_tag;
pub mod tag;
pub mod user;
