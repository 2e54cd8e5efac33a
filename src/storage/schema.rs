//! Database schema definitions

/// SQL to create the users table
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password VARCHAR(100) NOT NULL CHECK (length(password) <= 100),
    joined_at TEXT NOT NULL,
    is_admin INTEGER NOT NULL DEFAULT 0
)
"#;

/// SQL to create the posts table
pub const CREATE_POSTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    user_id INTEGER NOT NULL REFERENCES users(id),
    content TEXT NOT NULL
)
"#;

/// SQL to create the relationships table
pub const CREATE_RELATIONSHIPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS relationships (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    from_user_id INTEGER NOT NULL REFERENCES users(id),
    to_user_id INTEGER NOT NULL REFERENCES users(id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_posts_user ON posts(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_relationships_from ON relationships(from_user_id)",
    "CREATE INDEX IF NOT EXISTS idx_relationships_to ON relationships(to_user_id)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_relationships_pair ON relationships(from_user_id, to_user_id)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_USERS_TABLE,
        CREATE_POSTS_TABLE,
        CREATE_RELATIONSHIPS_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

/// Statements for the users table alone
pub fn user_schema_statements() -> Vec<&'static str> {
    vec![CREATE_USERS_TABLE]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_are_idempotent_ddl() {
        for stmt in all_schema_statements() {
            assert!(stmt.contains("IF NOT EXISTS"), "not idempotent: {}", stmt);
        }
    }

    #[test]
    fn test_tables_precede_indexes() {
        let stmts = all_schema_statements();
        let first_index = stmts.iter().position(|s| s.contains("INDEX")).unwrap();
        assert!(stmts[..first_index].iter().all(|s| s.contains("CREATE TABLE")));
    }
}
