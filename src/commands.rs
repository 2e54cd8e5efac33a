use std::collections::HashMap;
use std::path::Path;

use crate::{OutputMode, emit_success};
use social::ui::{self, Icons};
use social::{Error, Post, SocialStore, User, UserId};

/// Open the store, making sure the schema exists first
fn open_store(database: &Path) -> anyhow::Result<SocialStore> {
    social::initialize(database)?;
    Ok(SocialStore::open(database)?)
}

/// Resolve usernames for the authors of `posts`
fn author_names(store: &SocialStore, posts: &[Post]) -> anyhow::Result<HashMap<UserId, String>> {
    let mut names = HashMap::new();
    for post in posts {
        if names.contains_key(&post.user_id) {
            continue;
        }
        let name = store
            .get_user(post.user_id)?
            .map(|u| u.username)
            .unwrap_or_else(|| format!("#{}", post.user_id));
        names.insert(post.user_id, name);
    }
    Ok(names)
}

fn print_posts(store: &SocialStore, posts: &[Post], empty: &str, command: &str, output_mode: OutputMode) -> anyhow::Result<()> {
    let names = author_names(store, posts)?;

    if output_mode.is_human() {
        if posts.is_empty() {
            println!("{} {}", Icons::EMPTY, empty);
        } else {
            println!("{}", ui::post_table(posts, |p| names[&p.user_id].clone()));
        }
    } else {
        let data: Vec<_> = posts
            .iter()
            .map(|p| {
                serde_json::json!({
                    "post": p,
                    "author": names[&p.user_id],
                })
            })
            .collect();
        emit_success(output_mode, command, serde_json::json!(data))?;
    }
    Ok(())
}

fn print_users(users: &[User], empty: &str, command: &str, output_mode: OutputMode) -> anyhow::Result<()> {
    if output_mode.is_human() {
        if users.is_empty() {
            println!("{} {}", Icons::EMPTY, empty);
        } else {
            for user in users {
                ui::user_line(user);
            }
        }
    } else {
        emit_success(output_mode, command, serde_json::to_value(users)?)?;
    }
    Ok(())
}

pub fn run_init(database: &Path, users_only: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    if users_only {
        social::storage::create_user_table(database)?;
    } else {
        social::initialize(database)?;
    }

    if output_mode.is_human() {
        ui::success(&format!("Schema ready in {}", database.display()));
    } else {
        emit_success(
            output_mode,
            "init",
            serde_json::json!({
                "database": database.display().to_string(),
                "users_only": users_only,
            }),
        )?;
    }
    Ok(())
}

pub fn run_create_user(
    database: &Path,
    username: &str,
    email: &str,
    password: &str,
    admin: bool,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let mut store = open_store(database)?;

    let user = match store.create_user(username, email, password, admin) {
        Ok(user) => user,
        Err(Error::UserAlreadyExists) => {
            anyhow::bail!("User already exists: {} <{}>", username, email)
        }
        Err(err) => return Err(err.into()),
    };

    if output_mode.is_human() {
        ui::success(&format!("Created user {}", ui::bold(&user.username)));
        ui::info("Email", &user.email);
        if user.is_admin {
            ui::info("Role", "admin");
        }
    } else {
        emit_success(output_mode, "create-user", serde_json::to_value(&user)?)?;
    }

    store.close()?;
    Ok(())
}

pub fn run_post(database: &Path, username: &str, content: &str, output_mode: OutputMode) -> anyhow::Result<()> {
    let store = open_store(database)?;
    let author = store.require_user(username)?;
    let post = store.create_post(&author, content)?;

    if output_mode.is_human() {
        println!("{} {} posted #{}", Icons::MEMO, ui::bold(&author.username), post.id);
    } else {
        emit_success(output_mode, "post", serde_json::to_value(&post)?)?;
    }

    store.close()?;
    Ok(())
}

pub fn run_follow(database: &Path, from: &str, to: &str, output_mode: OutputMode) -> anyhow::Result<()> {
    let store = open_store(database)?;
    let follower = store.require_user(from)?;
    let followed = store.require_user(to)?;

    let relationship = match store.follow(&follower, &followed) {
        Ok(rel) => rel,
        Err(err) if err.is_unique_violation() => {
            anyhow::bail!("{} already follows {}", from, to)
        }
        Err(err) => return Err(err.into()),
    };

    if output_mode.is_human() {
        println!("{} {} now follows {}", Icons::LINK, ui::bold(from), ui::bold(to));
        if relationship.is_self_follow() {
            ui::warn("user follows themselves");
        }
    } else {
        emit_success(output_mode, "follow", serde_json::to_value(&relationship)?)?;
    }

    store.close()?;
    Ok(())
}

pub fn run_posts(database: &Path, username: &str, output_mode: OutputMode) -> anyhow::Result<()> {
    let store = open_store(database)?;
    let user = store.require_user(username)?;
    let posts = user.get_posts(&store)?;

    if output_mode.is_human() {
        ui::header(&format!("Posts by {}", user.username));
    }
    print_posts(&store, &posts, "No posts yet.", "posts", output_mode)?;

    store.close()?;
    Ok(())
}

pub fn run_stream(
    database: &Path,
    username: &str,
    limit: usize,
    offset: usize,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let store = open_store(database)?;
    let user = store.require_user(username)?;
    let posts = store.get_stream_page(&user, limit, offset)?;

    if output_mode.is_human() {
        ui::header(&format!("Stream for {}", user.username));
    }
    print_posts(&store, &posts, "Stream is empty.", "stream", output_mode)?;

    store.close()?;
    Ok(())
}

pub fn run_following(database: &Path, username: &str, output_mode: OutputMode) -> anyhow::Result<()> {
    let store = open_store(database)?;
    let user = store.require_user(username)?;
    let following = user.following(&store)?;

    if output_mode.is_human() {
        ui::section(&format!("{} follows", user.username));
    }
    print_users(&following, "Not following anyone.", "following", output_mode)?;

    store.close()?;
    Ok(())
}

pub fn run_followers(database: &Path, username: &str, output_mode: OutputMode) -> anyhow::Result<()> {
    let store = open_store(database)?;
    let user = store.require_user(username)?;
    let followers = user.followers(&store)?;

    if output_mode.is_human() {
        ui::section(&format!("Followers of {}", user.username));
    }
    print_users(&followers, "No followers.", "followers", output_mode)?;

    store.close()?;
    Ok(())
}

pub fn run_users(database: &Path, output_mode: OutputMode) -> anyhow::Result<()> {
    let store = open_store(database)?;
    let users = store.list_users()?;

    if output_mode.is_human() {
        if users.is_empty() {
            println!("{} No users yet.", Icons::EMPTY);
        } else {
            println!("{}", ui::user_table(&users));
        }
    } else {
        emit_success(output_mode, "users", serde_json::to_value(&users)?)?;
    }

    store.close()?;
    Ok(())
}

pub fn run_stats(database: &Path, output_mode: OutputMode) -> anyhow::Result<()> {
    let store = open_store(database)?;
    let stats = store.stats()?;

    if output_mode.is_human() {
        println!("{} Social Statistics ({})", Icons::STATS, ui::muted(&database.display().to_string()));
        let users = stats.users.to_string();
        let posts = stats.posts.to_string();
        let relationships = stats.relationships.to_string();
        println!(
            "{}",
            ui::stats_table(&[
                ("Users", users.as_str()),
                ("Posts", posts.as_str()),
                ("Relationships", relationships.as_str()),
            ])
        );
        println!("{} {}", Icons::DATABASE, database.display());
    } else {
        emit_success(output_mode, "stats", serde_json::to_value(&stats)?)?;
    }

    store.close()?;
    Ok(())
}
