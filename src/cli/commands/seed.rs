//! Seed command handler

use anyhow::Context;

use crate::config::Config;
use crate::db::Store;
use crate::services::CatalogSeeder;

pub async fn cmd_seed(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.database_url())
        .await
        .context("Failed to open database")?;

    let summary = CatalogSeeder::new(&store).run().await?;

    println!(
        "✓ Seeded {} studios and {} titles",
        summary.providers, summary.items
    );
    Ok(())
}
