use tabled::{settings::Style, Table, Tabled};

use crate::post::Post;
use crate::user::User;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Joined")]
    joined: String,
    #[tabled(rename = "Admin")]
    admin: String,
}

#[derive(Tabled)]
struct PostRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Content")]
    content: String,
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let rows: Vec<TableRow> = stats
        .iter()
        .map(|(label, value)| TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        })
        .collect();
    render(&rows)
}

pub fn user_table(users: &[User]) -> String {
    let rows: Vec<UserRow> = users
        .iter()
        .map(|u| UserRow {
            id: u.id.0,
            username: u.username.clone(),
            email: u.email.clone(),
            joined: u.joined_at.format("%Y-%m-%d %H:%M").to_string(),
            admin: if u.is_admin { "yes" } else { "" }.to_string(),
        })
        .collect();
    render(&rows)
}

/// `author` maps a post to its author's display name
pub fn post_table(posts: &[Post], author: impl Fn(&Post) -> String) -> String {
    let rows: Vec<PostRow> = posts
        .iter()
        .map(|p| PostRow {
            id: p.id.0,
            when: p.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            author: author(p),
            content: p.preview(60),
        })
        .collect();
    render(&rows)
}

fn render<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tables_render_nothing() {
        assert!(stats_table(&[]).is_empty());
        assert!(user_table(&[]).is_empty());
    }

    #[test]
    fn test_stats_table_contains_values() {
        let table = stats_table(&[("Users", "3"), ("Posts", "10")]);
        assert!(table.contains("Metric"));
        assert!(table.contains("Users"));
        assert!(table.contains("10"));
    }
}
