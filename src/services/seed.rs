//! Bundled demo catalog.
//!
//! Seed items name their provider by studio name; the seeder swaps that for
//! the id the provider received on insert.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::db::Store;
use crate::models::{CatalogItemInput, ProviderInput};

const SEED_DATA: &str = include_str!("../../data/seed.json");

#[derive(Debug, Deserialize)]
struct SeedFile {
    providers: Vec<ProviderInput>,
    items: Vec<CatalogItemInput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub providers: usize,
    pub items: usize,
}

pub struct CatalogSeeder<'a> {
    store: &'a Store,
}

impl<'a> CatalogSeeder<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Wipes both tables and inserts the bundled catalog through the same
    /// validation as the API.
    pub async fn run(&self) -> Result<SeedSummary> {
        let seed: SeedFile =
            serde_json::from_str(SEED_DATA).context("Bundled seed data is malformed")?;

        let removed_items = self.store.clear_catalog_items().await?;
        let removed_providers = self.store.clear_providers().await?;
        info!(removed_items, removed_providers, "Cleared catalog");

        let mut provider_ids = HashMap::new();
        for input in seed.providers {
            let record = input
                .into_record()
                .map_err(|errors| anyhow::anyhow!(errors.join(", ")))
                .context("Invalid seed provider")?;
            let id = self.store.insert_provider(&record).await?;
            provider_ids.insert(record.name_normalized, id);
        }

        let total = seed.items.len();
        for mut input in seed.items {
            let provider_name = input.provider.take().flatten();
            input.provider = provider_name
                .map(|name| {
                    provider_ids
                        .get(&name.trim().to_lowercase())
                        .map(ToString::to_string)
                        .with_context(|| format!("Seed item references unknown studio {name}"))
                })
                .transpose()?
                .map(Some);

            let title = input.title.clone().unwrap_or_default();
            let record = input
                .into_record()
                .map_err(|errors| anyhow::anyhow!(errors.join(", ")))
                .with_context(|| format!("Invalid seed item {title}"))?;
            self.store.insert_catalog_item(&record).await?;
        }

        let summary = SeedSummary {
            providers: provider_ids.len(),
            items: total,
        };
        info!(
            providers = summary.providers,
            items = summary.items,
            "Seed successful"
        );
        Ok(summary)
    }
}
