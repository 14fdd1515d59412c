//! Domain entities - the core business objects.
//!
//! Relationships are held as identifier references; related aggregates are
//! only present in the `*Details` types returned by explicit loads.

mod comment;
mod post;
mod reaction;
mod tag;
mod user;

pub use comment::{Comment, CommentDetails};
pub use post::{Post, PostDetails, PostStatus};
pub use reaction::{CommentReaction, PostReaction, ReactionToggle};
pub use tag::{Tag, TagDetails};
pub use user::User;
