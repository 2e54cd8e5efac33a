//! Follow relationships
//!
//! A relationship is a directed edge: `from_user` follows `to_user`.
//! Each ordered pair is stored at most once. Nothing stops a user from
//! following themselves.

use serde::Serialize;

use crate::user::UserId;

/// A follow edge between two users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relationship {
    pub id: i64,
    /// The follower
    pub from_user: UserId,
    /// The followed user
    pub to_user: UserId,
}

impl Relationship {
    pub fn is_self_follow(&self) -> bool {
        self.from_user == self.to_user
    }
}
