//! CLI administration tool for linkpulse.
//!
//! Queries analytics and click counts and performs database checks without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Clicks per day over the last week for one owner
//! cargo run --bin admin -- analytics --owner 6f1c... --view per-day
//!
//! # Latest clicks
//! cargo run --bin admin -- analytics --owner 6f1c... --view recent --limit 50
//!
//! # Total clicks for one short code
//! cargo run --bin admin -- clicks Xk3_a9QzLm0p
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use linkpulse::application::services::AnalyticsService;
use linkpulse::domain::entities::GroupDimension;
use linkpulse::infrastructure::persistence::PgClickRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// CLI tool for inspecting linkpulse data.
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
    /// Show an analytics view for one owner
    Analytics {
        /// Owner (user) id
        #[arg(short, long)]
        owner: Uuid,

        #[arg(short, long, value_enum, default_value_t = View::PerDay)]
        view: View,

        /// Number of clicks shown by the `recent` view
        #[arg(short, long)]
        limit: Option<i64>,
    },

    /// Show the total click count for a short code
    Clicks { short_code: String },

    /// Show global link and click totals
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    PerDay,
    ByCountry,
    ByDevice,
    Recent,
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

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Analytics { owner, view, limit } => {
            handle_analytics(&pool, owner, view, limit).await?
        }
        Commands::Clicks { short_code } => handle_clicks(&pool, &short_code).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn analytics_service(pool: &PgPool) -> AnalyticsService<PgClickRepository> {
    AnalyticsService::new(Arc::new(PgClickRepository::new(Arc::new(pool.clone()))))
}

/// Prints one analytics view followed by the owner's click total.
async fn handle_analytics(pool: &PgPool, owner: Uuid, view: View, limit: Option<i64>) -> Result<()> {
    let service = analytics_service(pool);

    println!("{}", "📊 Analytics".bright_blue().bold());
    println!("  Owner: {}", owner.to_string().bright_black());
    println!();

    match view {
        View::PerDay => {
            let rows = service
                .clicks_per_day(owner)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

            if rows.is_empty() {
                println!("{}", "  No clicks in the last 7 days".yellow());
            }
            for row in &rows {
                println!(
                    "  {} {:<4} {}",
                    row.date.format("%Y-%m-%d").to_string().bright_black(),
                    row.date.format("%a").to_string(),
                    row.clicks.to_string().bright_green().bold()
                );
            }
        }
        View::ByCountry | View::ByDevice => {
            let dimension = if matches!(view, View::ByCountry) {
                GroupDimension::Country
            } else {
                GroupDimension::Device
            };

            let rows = service
                .grouped(owner, dimension)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

            if rows.is_empty() {
                println!("{}", "  No clicks recorded".yellow());
            }
            for row in &rows {
                println!(
                    "  {:<12} {}",
                    row.label.cyan(),
                    row.count.to_string().bright_green().bold()
                );
            }
        }
        View::Recent => {
            let clicks = service
                .recent_clicks(owner, limit)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

            if clicks.is_empty() {
                println!("{}", "  No clicks recorded".yellow());
            }
            for click in &clicks {
                println!(
                    "  {} {:<10} {:<3} {}",
                    click
                        .created_at
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string()
                        .bright_black(),
                    click.device_type.as_deref().unwrap_or("unknown").cyan(),
                    click.country.as_deref().unwrap_or("--"),
                    click.referrer.as_deref().unwrap_or("").bright_black()
                );
            }
        }
    }

    let total = service
        .total_clicks(owner)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!();
    println!("  Total: {}", total.to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn handle_clicks(pool: &PgPool, short_code: &str) -> Result<()> {
    let count = analytics_service(pool)
        .click_count(short_code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "  {} {}",
        short_code.cyan(),
        count.to_string().bright_green().bold()
    );

    Ok(())
}

/// Displays system-wide totals.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let active_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE is_active")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks")
        .fetch_one(pool)
        .await?;

    println!(
        "  Links:        {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Active links: {}",
        active_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:       {}",
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

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
