//! # Social - data layer for a small social network
//!
//! Users, posts and follow relationships persisted in a single SQLite file.
//!
//! Social provides:
//! - Entity types for users, posts and relationships
//! - An idempotent schema initializer
//! - User creation with salted password hashing and uniqueness enforcement
//! - Follow graph queries (following / followers) and the post stream

pub mod user;
pub mod post;
pub mod relationship;
pub mod password;
pub mod storage;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use user::{AnonymousUser, Identity, User, UserId};
pub use post::{Post, PostId};
pub use relationship::Relationship;
pub use storage::{initialize, SocialStore};

/// Result type alias for Social operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Social operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Password hash error: {0}")]
    PasswordHash(String),
}

impl Error {
    /// True when SQLite rejected a write because of a UNIQUE column or index.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Error::UserAlreadyExists => true,
            Error::Storage(err) => storage::is_unique_violation(err),
            _ => false,
        }
    }
}
