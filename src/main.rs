//! Social CLI - manage the social network database from the command line

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use social::config;
use social::ui;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "social")]
#[command(version)]
#[command(about = "Users, posts and follow relationships on a single SQLite file")]
#[command(long_about = r#"
Social manages the data layer of a small social network:
  • Create the schema (idempotent)
  • Create users with hashed passwords
  • Write posts and follow other users
  • Read a user's posts, stream, followers and following

Example usage:
  social init
  social create-user --username alice --email alice@example.com --password hunter2
  social follow --from alice --to bob
  social stream --username alice
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    json: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create all tables if they do not exist
    Init {
        /// Only create the users table
        #[arg(long)]
        users_only: bool,

        /// Record the database path in the config file
        #[arg(long)]
        write_config: bool,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Create a new user
    CreateUser {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        /// Plaintext password (stored hashed)
        #[arg(short, long)]
        password: String,

        /// Grant admin rights
        #[arg(long)]
        admin: bool,
    },

    /// Write a post as a user
    Post {
        #[arg(short, long)]
        username: String,

        /// Post content
        content: String,
    },

    /// Make one user follow another
    Follow {
        /// The follower
        #[arg(long)]
        from: String,

        /// The user to follow
        #[arg(long)]
        to: String,
    },

    /// List a user's own posts
    Posts {
        #[arg(short, long)]
        username: String,
    },

    /// Show a user's stream (own posts and posts of followed users)
    Stream {
        #[arg(short, long)]
        username: String,

        /// Maximum number of posts
        #[arg(short, long, default_value = "100")]
        limit: usize,

        /// Number of posts to skip
        #[arg(long, default_value = "0")]
        offset: usize,
    },

    /// List the users a user follows
    Following {
        #[arg(short, long)]
        username: String,
    },

    /// List the users following a user
    Followers {
        #[arg(short, long)]
        username: String,
    },

    /// List all users
    Users,

    /// Show statistics about the database
    Stats,
}

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

/// Print a successful result as a JSON envelope (no-op in human mode)
pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if output_mode == OutputMode::Json {
        let envelope = serde_json::json!({
            "ok": true,
            "command": command,
            "data": data,
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };

    if let Err(err) = run(cli, output_mode) {
        if output_mode.is_human() {
            ui::error(&format!("{:#}", err));
        } else {
            let envelope = serde_json::json!({ "ok": false, "error": format!("{:#}", err) });
            println!("{}", envelope);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, output_mode: OutputMode) -> anyhow::Result<()> {
    let loaded = config::load_config(cli.config.as_deref())?;
    let database = config::resolve_database(cli.database, loaded.as_ref());
    config::ensure_db_dir(&database)?;
    tracing::debug!("Using database {:?}", database);

    match cli.command {
        Commands::Init { users_only, write_config, force } => {
            if write_config {
                let path = cli.config.clone().unwrap_or_else(config::default_config_path);
                let contents = config::SocialConfig {
                    database: Some(database.display().to_string()),
                };
                config::write_config(&path, &contents, force)?;
                tracing::info!("Wrote config to {}", path.display());
            }
            commands::run_init(&database, users_only, output_mode)
        }
        Commands::CreateUser { username, email, password, admin } => {
            commands::run_create_user(&database, &username, &email, &password, admin, output_mode)
        }
        Commands::Post { username, content } => {
            commands::run_post(&database, &username, &content, output_mode)
        }
        Commands::Follow { from, to } => commands::run_follow(&database, &from, &to, output_mode),
        Commands::Posts { username } => commands::run_posts(&database, &username, output_mode),
        Commands::Stream { username, limit, offset } => {
            commands::run_stream(&database, &username, limit, offset, output_mode)
        }
        Commands::Following { username } => commands::run_following(&database, &username, output_mode),
        Commands::Followers { username } => commands::run_followers(&database, &username, output_mode),
        Commands::Users => commands::run_users(&database, output_mode),
        Commands::Stats => commands::run_stats(&database, output_mode),
    }
}
