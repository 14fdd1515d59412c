//! # Quill Core
//!
//! The domain layer of Quillpost: entities, ports and the ranking rules
//! behind the home page lists. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod ranking;

pub use error::{DomainError, RepoError};
