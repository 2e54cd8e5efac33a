//! Posts

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

use crate::user::UserId;

/// Primary key of a row in the `posts` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PostId(pub i64);

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for PostId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for PostId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(PostId)
    }
}

/// A post belongs to exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: PostId,
    pub timestamp: DateTime<Utc>,
    pub user_id: UserId,
    pub content: String,
}

impl Post {
    /// First line of the content, cut to `max` characters for listings
    pub fn preview(&self, max: usize) -> String {
        let first_line = self.content.lines().next().unwrap_or("");
        if first_line.chars().count() > max {
            let cut: String = first_line.chars().take(max).collect();
            format!("{}...", cut)
        } else {
            first_line.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(content: &str) -> Post {
        Post {
            id: PostId(1),
            timestamp: Utc::now(),
            user_id: UserId(1),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_preview_short() {
        assert_eq!(sample_post("hello").preview(10), "hello");
    }

    #[test]
    fn test_preview_truncates_first_line() {
        let post = sample_post("a rather long first line\nsecond line");
        assert_eq!(post.preview(8), "a rather...");
        assert_eq!(sample_post("one\ntwo").preview(10), "one");
    }
}
