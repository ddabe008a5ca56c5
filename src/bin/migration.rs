use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use inventory_po_api::db::{establish_connection_with_config, DbConfig};
use migrations::Migrator;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Direction {
    /// Apply every pending migration
    Up,
    /// Roll back the most recent migration
    Down,
    /// Drop every table and re-apply all migrations
    Fresh,
    /// Show which migrations have been applied
    Status,
}

#[derive(Parser)]
#[command(name = "migration", about = "Manage the inventory database schema", version)]
struct Cli {
    #[arg(value_enum, default_value = "up")]
    direction: Direction,
    /// Database URL; falls back to DATABASE_URL, then a local SQLite file
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    let database_url = cli
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite://inventory.db?mode=rwc".to_string());

    info!("Connecting to database: {}", database_url);
    let db = establish_connection_with_config(&DbConfig {
        url: database_url,
        max_connections: 1,
        ..Default::default()
    })
    .await
    .context("failed to connect to database")?;

    match cli.direction {
        Direction::Up => Migrator::up(&db, None).await?,
        Direction::Down => Migrator::down(&db, Some(1)).await?,
        Direction::Fresh => Migrator::fresh(&db).await?,
        Direction::Status => Migrator::status(&db).await?,
    }

    info!(direction = ?cli.direction, "Migration command completed");
    Ok(())
}
