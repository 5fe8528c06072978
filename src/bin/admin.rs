//! CLI administration tool for link-tracker.
//!
//! Lists and deletes links, shows totals and checks the database without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List the 20 newest links
//! cargo run --bin admin -- links list --limit 20
//!
//! # Delete a link and its click history
//! cargo run --bin admin -- links delete promo
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_USER`/`DB_PASSWORD`/`DB_NAME` (required)

use link_tracker::application::services::link_service::MAX_PAGE_SIZE;
use link_tracker::config::Config;
use link_tracker::domain::repositories::LinkStore;
use link_tracker::infrastructure::persistence::PgLinkStore;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing link-tracker.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinksAction {
    /// List links, newest first
    List {
        /// Number of links to show (max 50)
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Delete a link and its click history
    Delete {
        /// Short code to delete
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL (or DB_HOST and credentials) must be set")?;

    let pool = PgLinkStore::connect(&database_url, &config.pool_settings())
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Links { action } => handle_links_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_links_action(action: LinksAction, pool: &PgPool) -> Result<()> {
    let store = PgLinkStore::new(Arc::new(pool.clone()));

    match action {
        LinksAction::List { limit } => list_links(&store, limit).await?,
        LinksAction::Delete { code, yes } => delete_link(&store, &code, yes).await?,
    }

    Ok(())
}

/// Lists the newest links.
///
/// # Output Format
///
/// ```text
/// 📋 Links
///
///   Code       Clicks  Created           Status    Destination
///   ───────────────────────────────────────────────────────────────────────
///   promo      3       2025-01-15 10:30  ACTIVE    https://example.com/page
///   Xk3_a9Qz   0       2025-01-14 09:12  EXPIRED   https://example.org
/// ```
async fn list_links(store: &PgLinkStore, limit: usize) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    let limit = limit.clamp(1, MAX_PAGE_SIZE);
    let links = store
        .list(limit, 0)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<10} {:<7} {:<17} {:<9} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    let now = chrono::Utc::now();
    for link in &links {
        let status = if !link.active {
            "INACTIVE".red()
        } else if link.is_expired_at(now) {
            "EXPIRED".yellow()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<10} {:<7} {:<17} {:<9} {}",
            link.code.cyan(),
            link.click_count.to_string().bright_white(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status,
            link.destination_url
        );
    }

    println!();
    println!("  Shown: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(store: &PgLinkStore, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete Link".bright_blue().bold());
    println!();

    let link = store
        .find_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Link not found")?;

    println!("  Code:        {}", link.code.cyan());
    println!("  Destination: {}", link.destination_url);
    println!("  Clicks:      {}", link.click_count.to_string().bright_white());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link and its click history?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = store
        .delete(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    if deleted {
        println!("{}", "✅ Link deleted".green().bold());
    } else {
        println!("{}", "⚠️  Link was already gone".yellow());
    }
    println!();

    Ok(())
}

/// Displays total links and total clicks.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let store = PgLinkStore::new(Arc::new(pool.clone()));

    let links_count = store
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;
    let clicks_count = store
        .total_clicks()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count clicks: {}", e))?;

    println!(
        "  Links:  {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks: {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: Option<i64> = sqlx::query_scalar(
                "SELECT COUNT(*) FROM _sqlx_migrations WHERE success",
            )
            .fetch_optional(pool)
            .await
            .ok()
            .flatten();

            println!("  PostgreSQL: {}", version.bright_white());
            match migrations {
                Some(n) => println!("  Migrations: {}", n.to_string().bright_white()),
                None => println!("  Migrations: {}", "not applied".yellow()),
            }
            println!();
        }
    }

    Ok(())
}
