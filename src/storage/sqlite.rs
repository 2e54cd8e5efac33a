//! SQLite storage implementation

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, TransactionBehavior};

use super::schema;
use crate::password;
use crate::post::{Post, PostId};
use crate::relationship::Relationship;
use crate::user::{User, UserId};
use crate::{Error, Result};

/// Create every table and index if absent, then close the connection.
///
/// Safe to call on every process start.
pub fn initialize(path: &Path) -> Result<()> {
    let store = SocialStore::open(path)?;
    if store.has_table("relationships")? {
        tracing::debug!("Schema already present in {}", path.display());
    } else {
        tracing::info!("Creating schema in {}", path.display());
    }
    store.create_tables()?;
    store.close()
}

/// Create only the users table, then close the connection.
pub fn create_user_table(path: &Path) -> Result<()> {
    let store = SocialStore::open(path)?;
    store.create_user_table()?;
    store.close()
}

/// Whether a storage error is a UNIQUE constraint violation.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

/// SQLite-backed storage for users, posts and relationships
pub struct SocialStore {
    conn: Connection,
}

impl SocialStore {
    /// Open a database file (creates the file if it doesn't exist, but not the tables)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        tracing::debug!("Opened database {}", path.display());
        Self::from_connection(conn)
    }

    /// Open an in-memory database with the full schema (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let store = Self::from_connection(Connection::open_in_memory()?)?;
        store.create_tables()?;
        Ok(store)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self { conn })
    }

    /// Close the connection, surfacing any error SQLite reports
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| Error::from(err))
    }

    /// Create all tables and indexes (no-op for objects that already exist)
    pub fn create_tables(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        tracing::debug!("Schema ready (users, posts, relationships)");
        Ok(())
    }

    /// Whether a table with this name exists
    pub fn has_table(&self, name: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Create only the users table
    pub fn create_user_table(&self) -> Result<()> {
        for stmt in schema::user_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        tracing::debug!("Schema ready (users)");
        Ok(())
    }

    // ========== User Operations ==========

    /// Hash the password and insert a new user inside a write transaction.
    ///
    /// Fails with [`Error::UserAlreadyExists`] when the username or email is
    /// taken; nothing is inserted in that case.
    pub fn create_user(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        admin: bool,
    ) -> Result<User> {
        let password = password::hash_password(password)?;
        let joined_at = Utc::now();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let inserted = tx.execute(
            r#"
            INSERT INTO users (username, email, password, joined_at, is_admin)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![username, email, password, joined_at, admin],
        );

        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                tracing::debug!("Rejected duplicate user {} <{}>", username, email);
                return Err(Error::UserAlreadyExists);
            }
            Err(err) => return Err(err.into()),
        }

        let id = UserId(tx.last_insert_rowid());
        tx.commit()?;
        tracing::info!("Created user {} (id {})", username, id);

        Ok(User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password,
            joined_at,
            is_admin: admin,
        })
    }

    /// Get a user by primary key
    pub fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, username, email, password, joined_at, is_admin FROM users WHERE id = ?1",
                [id],
                Self::row_to_user,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a user by username
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, username, email, password, joined_at, is_admin FROM users WHERE username = ?1",
                [username],
                Self::row_to_user,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a user by email (the login lookup)
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, username, email, password, joined_at, is_admin FROM users WHERE email = ?1",
                [email],
                Self::row_to_user,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a user by username, failing with [`Error::UserNotFound`]
    pub fn require_user(&self, username: &str) -> Result<User> {
        self.get_user_by_username(username)?
            .ok_or_else(|| Error::UserNotFound(username.to_string()))
    }

    /// All users, newest first
    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, username, email, password, joined_at, is_admin FROM users ORDER BY joined_at DESC, id DESC",
        )?;

        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(users)
    }

    /// Count all users
    pub fn count_users(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Users that `user` follows
    pub fn following(&self, user: &User) -> Result<Vec<User>> {
        tracing::debug!("Loading users followed by {}", user.username);
        let mut stmt = self.conn.prepare(
            r#"
            SELECT users.id, users.username, users.email, users.password, users.joined_at, users.is_admin
            FROM users
            INNER JOIN relationships ON relationships.to_user_id = users.id
            WHERE relationships.from_user_id = ?1
            ORDER BY users.joined_at DESC, users.id DESC
            "#,
        )?;

        let users = stmt
            .query_map([user.id], Self::row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(users)
    }

    /// Users following `user`
    pub fn followers(&self, user: &User) -> Result<Vec<User>> {
        tracing::debug!("Loading followers of {}", user.username);
        let mut stmt = self.conn.prepare(
            r#"
            SELECT users.id, users.username, users.email, users.password, users.joined_at, users.is_admin
            FROM users
            INNER JOIN relationships ON relationships.from_user_id = users.id
            WHERE relationships.to_user_id = ?1
            ORDER BY users.joined_at DESC, users.id DESC
            "#,
        )?;

        let users = stmt
            .query_map([user.id], Self::row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(users)
    }

    /// Helper to convert a row to a User
    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            joined_at: row.get(4)?,
            is_admin: row.get(5)?,
        })
    }

    // ========== Post Operations ==========

    /// Insert a post stamped with the current time
    pub fn create_post(&self, user: &User, content: &str) -> Result<Post> {
        self.create_post_at(user, content, Utc::now())
    }

    /// Insert a post with an explicit timestamp
    pub fn create_post_at(&self, user: &User, content: &str, timestamp: DateTime<Utc>) -> Result<Post> {
        self.conn.execute(
            "INSERT INTO posts (timestamp, user_id, content) VALUES (?1, ?2, ?3)",
            params![timestamp, user.id, content],
        )?;
        let id = PostId(self.conn.last_insert_rowid());
        tracing::debug!("User {} wrote post {}", user.username, id);

        Ok(Post {
            id,
            timestamp,
            user_id: user.id,
            content: content.to_string(),
        })
    }

    /// Get a post by primary key
    pub fn get_post(&self, id: PostId) -> Result<Option<Post>> {
        self.conn
            .query_row(
                "SELECT id, timestamp, user_id, content FROM posts WHERE id = ?1",
                [id],
                Self::row_to_post,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Posts written by `user`, newest first
    pub fn get_posts(&self, user: &User) -> Result<Vec<Post>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, user_id, content FROM posts WHERE user_id = ?1 ORDER BY timestamp DESC, id DESC",
        )?;

        let posts = stmt
            .query_map([user.id], Self::row_to_post)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(posts)
    }

    /// Posts by `user` or by anyone `user` follows, newest first
    pub fn get_stream(&self, user: &User) -> Result<Vec<Post>> {
        tracing::debug!("Loading stream for {}", user.username);
        let mut stmt = self.conn.prepare(
            r#"
            SELECT posts.id, posts.timestamp, posts.user_id, posts.content
            FROM posts
            WHERE posts.user_id IN (
                SELECT users.id
                FROM users
                INNER JOIN relationships ON relationships.to_user_id = users.id
                WHERE relationships.from_user_id = ?1
            )
            OR posts.user_id = ?1
            ORDER BY posts.timestamp DESC, posts.id DESC
            "#,
        )?;

        let posts = stmt
            .query_map([user.id], Self::row_to_post)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(posts)
    }

    /// One page of [`get_stream`](Self::get_stream)
    pub fn get_stream_page(&self, user: &User, limit: usize, offset: usize) -> Result<Vec<Post>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT posts.id, posts.timestamp, posts.user_id, posts.content
            FROM posts
            WHERE posts.user_id IN (
                SELECT users.id
                FROM users
                INNER JOIN relationships ON relationships.to_user_id = users.id
                WHERE relationships.from_user_id = ?1
            )
            OR posts.user_id = ?1
            ORDER BY posts.timestamp DESC, posts.id DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )?;

        let posts = stmt
            .query_map(params![user.id, limit as i64, offset as i64], Self::row_to_post)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(posts)
    }

    /// Latest posts from everyone
    pub fn list_posts(&self, limit: usize) -> Result<Vec<Post>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, user_id, content FROM posts ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )?;

        let posts = stmt
            .query_map([limit as i64], Self::row_to_post)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(posts)
    }

    /// Count all posts
    pub fn count_posts(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Helper to convert a row to a Post
    fn row_to_post(row: &rusqlite::Row) -> rusqlite::Result<Post> {
        Ok(Post {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            user_id: row.get(2)?,
            content: row.get(3)?,
        })
    }

    // ========== Relationship Operations ==========

    /// Record that `from` follows `to`.
    ///
    /// Following the same user twice violates the unique pair index and
    /// returns the storage error unchanged.
    pub fn follow(&self, from: &User, to: &User) -> Result<Relationship> {
        self.conn.execute(
            "INSERT INTO relationships (from_user_id, to_user_id) VALUES (?1, ?2)",
            params![from.id, to.id],
        )?;
        tracing::debug!("{} now follows {}", from.username, to.username);

        Ok(Relationship {
            id: self.conn.last_insert_rowid(),
            from_user: from.id,
            to_user: to.id,
        })
    }

    /// Whether `from` follows `to`
    pub fn is_following(&self, from: &User, to: &User) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM relationships WHERE from_user_id = ?1 AND to_user_id = ?2",
                [from.id, to.id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Count relationships
    pub fn count_relationships(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM relationships", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            users: self.count_users()?,
            posts: self.count_posts()?,
            relationships: self.count_relationships()?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub users: usize,
    pub posts: usize,
    pub relationships: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Users: {}", self.users)?;
        writeln!(f, "  Posts: {}", self.posts)?;
        writeln!(f, "  Relationships: {}", self.relationships)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::collections::HashSet;

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn sample_user(store: &mut SocialStore, name: &str) -> User {
        store
            .create_user(name, &format!("{}@example.com", name), "password", false)
            .unwrap()
    }

    fn ids(users: &[User]) -> HashSet<UserId> {
        users.iter().map(|u| u.id).collect()
    }

    #[test]
    fn test_create_user_hashes_password() {
        let mut store = SocialStore::open_in_memory().unwrap();

        let created = store.create_user("alice", "alice@example.com", "s3cret", true).unwrap();
        let retrieved = store.get_user_by_username("alice").unwrap().unwrap();

        assert_eq!(retrieved.id, created.id);
        assert_eq!(retrieved.email, "alice@example.com");
        assert!(retrieved.is_admin);
        assert_ne!(retrieved.password, "s3cret");
        assert!(retrieved.verify_password("s3cret"));
    }

    #[test]
    fn test_create_user_defaults_to_non_admin() {
        let mut store = SocialStore::open_in_memory().unwrap();
        let bob = sample_user(&mut store, "bob");
        assert!(!store.get_user(bob.id).unwrap().unwrap().is_admin);
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let mut store = SocialStore::open_in_memory().unwrap();
        sample_user(&mut store, "alice");

        let err = store
            .create_user("alice", "other@example.com", "password", false)
            .unwrap_err();
        assert!(matches!(err, Error::UserAlreadyExists));
        assert_eq!(err.to_string(), "User already exists");
        assert_eq!(store.count_users().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let mut store = SocialStore::open_in_memory().unwrap();
        sample_user(&mut store, "alice");

        let err = store
            .create_user("alice2", "alice@example.com", "password", false)
            .unwrap_err();
        assert!(matches!(err, Error::UserAlreadyExists));
        assert!(store.get_user_by_username("alice2").unwrap().is_none());
        assert_eq!(store.count_users().unwrap(), 1);
    }

    #[test]
    fn test_store_usable_after_rejected_user() {
        let mut store = SocialStore::open_in_memory().unwrap();
        sample_user(&mut store, "alice");
        assert!(store.create_user("alice", "x@example.com", "pw", false).is_err());

        // the failed transaction must not be left open
        sample_user(&mut store, "bob");
        assert_eq!(store.count_users().unwrap(), 2);
    }

    #[test]
    fn test_lookup_by_email() {
        let mut store = SocialStore::open_in_memory().unwrap();
        let alice = sample_user(&mut store, "alice");

        let found = store.get_user_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(found, alice);
        assert!(store.get_user_by_email("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn test_require_user_missing() {
        let store = SocialStore::open_in_memory().unwrap();
        let err = store.require_user("ghost").unwrap_err();
        assert!(matches!(err, Error::UserNotFound(name) if name == "ghost"));
    }

    #[test]
    fn test_list_users_newest_first() {
        let mut store = SocialStore::open_in_memory().unwrap();
        sample_user(&mut store, "first");
        sample_user(&mut store, "second");
        sample_user(&mut store, "third");

        let names: Vec<_> = store.list_users().unwrap().into_iter().map(|u| u.username).collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_following_and_followers() {
        let mut store = SocialStore::open_in_memory().unwrap();
        let a = sample_user(&mut store, "a");
        let b = sample_user(&mut store, "b");

        store.follow(&a, &b).unwrap();

        assert!(a.following(&store).unwrap().contains(&b));
        assert!(b.followers(&store).unwrap().contains(&a));
        assert!(!b.following(&store).unwrap().contains(&a));
        assert!(a.followers(&store).unwrap().is_empty());

        assert!(store.is_following(&a, &b).unwrap());
        assert!(!store.is_following(&b, &a).unwrap());
    }

    #[test]
    fn test_following_many() {
        let mut store = SocialStore::open_in_memory().unwrap();
        let a = sample_user(&mut store, "a");
        let b = sample_user(&mut store, "b");
        let c = sample_user(&mut store, "c");
        let d = sample_user(&mut store, "d");

        store.follow(&a, &b).unwrap();
        store.follow(&a, &c).unwrap();
        store.follow(&d, &b).unwrap();

        assert_eq!(ids(&store.following(&a).unwrap()), ids(&[b.clone(), c.clone()]));
        assert_eq!(ids(&store.followers(&b).unwrap()), ids(&[a.clone(), d.clone()]));
        assert_eq!(ids(&store.followers(&c).unwrap()), ids(&[a]));
    }

    #[test]
    fn test_duplicate_follow_rejected() {
        let mut store = SocialStore::open_in_memory().unwrap();
        let a = sample_user(&mut store, "a");
        let b = sample_user(&mut store, "b");

        store.follow(&a, &b).unwrap();
        let err = store.follow(&a, &b).unwrap_err();

        assert!(matches!(err, Error::Storage(_)));
        assert!(err.is_unique_violation());
        assert_eq!(store.count_relationships().unwrap(), 1);

        // the reverse edge is a different pair
        store.follow(&b, &a).unwrap();
        assert_eq!(store.count_relationships().unwrap(), 2);
    }

    #[test]
    fn test_self_follow_allowed() {
        let mut store = SocialStore::open_in_memory().unwrap();
        let a = sample_user(&mut store, "a");

        let rel = store.follow(&a, &a).unwrap();
        assert!(rel.is_self_follow());
        assert_eq!(store.following(&a).unwrap(), vec![a.clone()]);
        assert_eq!(store.followers(&a).unwrap(), vec![a]);
    }

    #[test]
    fn test_get_posts_newest_first() {
        let mut store = SocialStore::open_in_memory().unwrap();
        let a = sample_user(&mut store, "a");
        let b = sample_user(&mut store, "b");

        store.create_post_at(&a, "old", at(0)).unwrap();
        store.create_post_at(&b, "not mine", at(1)).unwrap();
        store.create_post_at(&a, "new", at(2)).unwrap();

        let contents: Vec<_> = a.get_posts(&store).unwrap().into_iter().map(|p| p.content).collect();
        assert_eq!(contents, vec!["new", "old"]);
    }

    #[test]
    fn test_post_roundtrip() {
        let mut store = SocialStore::open_in_memory().unwrap();
        let a = sample_user(&mut store, "a");

        let post = store.create_post_at(&a, "hello\nworld", at(5)).unwrap();
        let retrieved = store.get_post(post.id).unwrap().unwrap();
        assert_eq!(retrieved, post);
    }

    #[test]
    fn test_post_requires_existing_user() {
        let mut store = SocialStore::open_in_memory().unwrap();
        let mut ghost = sample_user(&mut store, "a");
        ghost.id = UserId(999);

        assert!(store.create_post(&ghost, "orphan").is_err());
        assert_eq!(store.count_posts().unwrap(), 0);
    }

    #[test]
    fn test_stream_is_own_plus_followed() {
        let mut store = SocialStore::open_in_memory().unwrap();
        let a = sample_user(&mut store, "a");
        let b = sample_user(&mut store, "b");
        let c = sample_user(&mut store, "c");
        let stranger = sample_user(&mut store, "stranger");

        store.follow(&a, &b).unwrap();
        store.follow(&a, &c).unwrap();
        store.follow(&stranger, &a).unwrap();

        let a1 = store.create_post_at(&a, "a1", at(0)).unwrap();
        let b1 = store.create_post_at(&b, "b1", at(1)).unwrap();
        store.create_post_at(&stranger, "s1", at(2)).unwrap();
        let c1 = store.create_post_at(&c, "c1", at(3)).unwrap();
        let a2 = store.create_post_at(&a, "a2", at(4)).unwrap();

        let stream = a.get_stream(&store).unwrap();
        assert_eq!(stream, vec![a2, c1, b1, a1]);
    }

    #[test]
    fn test_stream_with_self_follow_has_no_duplicates() {
        let mut store = SocialStore::open_in_memory().unwrap();
        let a = sample_user(&mut store, "a");
        store.follow(&a, &a).unwrap();
        store.create_post_at(&a, "only", at(0)).unwrap();

        assert_eq!(store.get_stream(&a).unwrap().len(), 1);
    }

    #[test]
    fn test_stream_is_not_reciprocal() {
        let mut store = SocialStore::open_in_memory().unwrap();
        let a = sample_user(&mut store, "a");
        let b = sample_user(&mut store, "b");
        store.follow(&a, &b).unwrap();
        store.create_post_at(&a, "from a", at(0)).unwrap();

        assert!(store.get_stream(&b).unwrap().is_empty());
    }

    #[test]
    fn test_stream_page() {
        let mut store = SocialStore::open_in_memory().unwrap();
        let a = sample_user(&mut store, "a");
        for i in 0..5 {
            store.create_post_at(&a, &format!("post {}", i), at(i)).unwrap();
        }

        let page: Vec<_> = store
            .get_stream_page(&a, 2, 1)
            .unwrap()
            .into_iter()
            .map(|p| p.content)
            .collect();
        assert_eq!(page, vec!["post 3", "post 2"]);
        assert!(store.get_stream_page(&a, 10, 5).unwrap().is_empty());
    }

    #[test]
    fn test_list_posts_limit() {
        let mut store = SocialStore::open_in_memory().unwrap();
        let a = sample_user(&mut store, "a");
        let b = sample_user(&mut store, "b");
        store.create_post_at(&a, "1", at(1)).unwrap();
        store.create_post_at(&b, "2", at(2)).unwrap();
        store.create_post_at(&a, "3", at(3)).unwrap();

        let latest: Vec<_> = store.list_posts(2).unwrap().into_iter().map(|p| p.content).collect();
        assert_eq!(latest, vec!["3", "2"]);
    }

    #[test]
    fn test_stats() {
        let mut store = SocialStore::open_in_memory().unwrap();
        let a = sample_user(&mut store, "a");
        let b = sample_user(&mut store, "b");
        store.follow(&a, &b).unwrap();
        store.create_post(&a, "hi").unwrap();

        let stats = store.stats().unwrap();
        assert_eq!((stats.users, stats.posts, stats.relationships), (2, 1, 1));
        assert!(stats.to_string().contains("Users: 2"));
    }

    #[test]
    fn test_initialize_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("social.db");

        initialize(&path).unwrap();
        initialize(&path).unwrap();

        let conn = Connection::open(&path).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'posts', 'relationships')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        let pair_index: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_relationships_pair'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
        assert_eq!(pair_index, 1);
    }

    #[test]
    fn test_initialize_preserves_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("social.db");

        initialize(&path).unwrap();
        {
            let mut store = SocialStore::open(&path).unwrap();
            sample_user(&mut store, "kept");
            store.close().unwrap();
        }
        initialize(&path).unwrap();

        let store = SocialStore::open(&path).unwrap();
        assert!(store.get_user_by_username("kept").unwrap().is_some());
    }

    #[test]
    fn test_has_table_tracks_initialization() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("social.db");

        let store = SocialStore::open(&path).unwrap();
        assert!(!store.has_table("relationships").unwrap());
        store.close().unwrap();

        initialize(&path).unwrap();
        let store = SocialStore::open(&path).unwrap();
        assert!(store.has_table("users").unwrap());
        assert!(store.has_table("relationships").unwrap());
        assert!(!store.has_table("nope").unwrap());
    }

    #[test]
    fn test_create_user_table_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.db");

        create_user_table(&path).unwrap();

        let mut store = SocialStore::open(&path).unwrap();
        sample_user(&mut store, "solo");
        assert_eq!(store.count_users().unwrap(), 1);
        assert!(store.count_posts().is_err());

        // the full initializer completes the schema afterwards
        store.close().unwrap();
        initialize(&path).unwrap();
        let store = SocialStore::open(&path).unwrap();
        assert_eq!(store.count_posts().unwrap(), 0);
    }
}
