//! User accounts
//!
//! A [`User`] owns posts and sits on either side of follow relationships.
//! The query helpers here take the store explicitly; there is no global
//! database handle.

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

use crate::Result;
use crate::password;
use crate::post::Post;
use crate::storage::SocialStore;

/// Primary key of a row in the `users` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for UserId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for UserId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(UserId)
    }
}

/// Minimal identity contract a web session layer needs from an account.
pub trait Identity {
    /// Stable unique identifier, as a string for session storage
    fn id(&self) -> String;

    /// Whether the account may log in
    fn is_active(&self) -> bool;

    /// Whether this identity has proven who it is
    fn is_authenticated(&self) -> bool;

    /// Whether this is the placeholder for a visitor without an account
    fn is_anonymous(&self) -> bool {
        !self.is_authenticated()
    }
}

/// A persisted user account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// argon2 PHC string, never the plaintext
    #[serde(skip_serializing)]
    pub password: String,
    pub joined_at: DateTime<Utc>,
    pub is_admin: bool,
}

impl User {
    /// Check a candidate plaintext against the stored hash
    pub fn verify_password(&self, candidate: &str) -> bool {
        password::verify_password(candidate, &self.password)
    }

    /// Posts written by this user, newest first
    pub fn get_posts(&self, store: &SocialStore) -> Result<Vec<Post>> {
        store.get_posts(self)
    }

    /// This user's posts plus the posts of everyone they follow, newest first
    pub fn get_stream(&self, store: &SocialStore) -> Result<Vec<Post>> {
        store.get_stream(self)
    }

    /// Users this user follows
    pub fn following(&self, store: &SocialStore) -> Result<Vec<User>> {
        store.following(self)
    }

    /// Users following this user
    pub fn followers(&self, store: &SocialStore) -> Result<Vec<User>> {
        store.followers(self)
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl std::hash::Hash for User {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Identity for User {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn is_active(&self) -> bool {
        true
    }

    fn is_authenticated(&self) -> bool {
        true
    }
}

/// Stand-in identity for a visitor who has not logged in.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousUser;

impl Identity for AnonymousUser {
    fn id(&self) -> String {
        String::new()
    }

    fn is_active(&self) -> bool {
        false
    }

    fn is_authenticated(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(id: i64) -> User {
        User {
            id: UserId(id),
            username: format!("user{}", id),
            email: format!("user{}@example.com", id),
            password: password::hash_password("secret").unwrap(),
            joined_at: Utc::now(),
            is_admin: false,
        }
    }

    #[test]
    fn test_user_identity() {
        let user = sample_user(42);
        assert_eq!(Identity::id(&user), "42");
        assert!(user.is_active());
        assert!(user.is_authenticated());
        assert!(!user.is_anonymous());
    }

    #[test]
    fn test_anonymous_identity() {
        let anon = AnonymousUser;
        assert_eq!(anon.id(), "");
        assert!(!anon.is_active());
        assert!(!anon.is_authenticated());
        assert!(anon.is_anonymous());
    }

    #[test]
    fn test_equality_by_id() {
        let a = sample_user(1);
        let mut b = sample_user(1);
        b.username = "renamed".to_string();
        assert_eq!(a, b);
        assert_ne!(a, sample_user(2));
    }

    #[test]
    fn test_password_not_serialized() {
        let json = serde_json::to_value(sample_user(7)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "user7");
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn test_verify_password() {
        let user = sample_user(3);
        assert!(user.verify_password("secret"));
        assert!(!user.verify_password("Secret"));
    }
}
