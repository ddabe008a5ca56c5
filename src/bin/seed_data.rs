//! Seed data script - populates an empty database with the demo catalog
//!
//! Run with: cargo run --bin seed-data
//!
//! This creates, when the tables are empty:
//! - 5 parts with prices and stock on hand
//! - 3 clients with zero balances

use anyhow::{Context, Result};
use tracing::info;

use inventory_po_api::{
    config,
    db::{self, seed_demo_data},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::load_config().context("failed to load application config")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    info!("=== Inventory Seed Data ===");

    let db = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to database")?;
    db::run_migrations(&db)
        .await
        .context("failed to run migrations")?;

    let summary = seed_demo_data(&db).await.context("failed to seed data")?;
    info!("  Created {} parts", summary.parts);
    info!("  Created {} clients", summary.clients);

    db::close_pool(db).await?;
    Ok(())
}
