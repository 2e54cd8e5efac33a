//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - users(id, username, email, password, joined_at, is_admin)
//! - posts(id, timestamp, user_id, content)
//! - relationships(id, from_user_id, to_user_id)

pub mod schema;
pub mod sqlite;

pub use sqlite::{create_user_table, initialize, is_unique_violation, DbStats, SocialStore};
