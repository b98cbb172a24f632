//! List catalog command handler

use crate::config::Config;
use crate::db::Store;
use crate::domain::{SortField, SortOrder};
use crate::services::CatalogFilter;

pub async fn cmd_list_catalog(config: &Config, limit: u64) -> anyhow::Result<()> {
    let store = Store::new(&config.database_url()).await?;

    let filter = CatalogFilter::default();
    let ordering = [
        (SortField::Rating, SortOrder::Descending),
        (SortField::CreatedAt, SortOrder::Descending),
    ];

    let (total, items) = tokio::try_join!(
        store.count_catalog_items(&filter),
        store.find_catalog_items(&filter, &ordering, 0, limit.max(1)),
    )?;

    if items.is_empty() {
        println!("The catalog is empty.");
        println!();
        println!("Load the demo data with: anicat seed");
        return Ok(());
    }

    println!("Catalog ({} of {} titles)", items.len(), total);
    println!("{:-<70}", "");

    for item in items {
        let status_indicator = if item.is_ongoing {
            "🟢"
        } else if item.release_date > chrono::Utc::now() {
            "📅"
        } else {
            "•"
        };

        let studio = item
            .provider
            .as_ref()
            .map_or("unknown studio", |provider| provider.name.as_str());

        println!(
            "{} {} ({}) [{:.1}]",
            status_indicator, item.title, item.year, item.rating
        );
        println!(
            "  ID: {} | Episodes: {} | Studio: {}",
            item.id, item.episodes, studio
        );
    }

    println!();
    println!("Legend: 🟢 Airing | 📅 Upcoming");

    Ok(())
}
