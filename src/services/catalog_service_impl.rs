//! `SeaORM` implementation of the [`CatalogService`] trait.
//!
//! Independent reads (page and count, the discovery sections) are issued
//! concurrently against the shared store.

use crate::api::types::{CatalogPage, Discovery, DiscoveryStats};
use crate::db::{LazyStore, Store};
use crate::domain::{CatalogItemId, SortField, SortKey, SortOrder};
use crate::models::{CatalogItem, CatalogItemInput};
use crate::services::catalog_filter::CatalogFilter;
use crate::services::catalog_service::{CatalogError, CatalogService, ListQuery};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Size of every list section of the discovery view.
pub const DISCOVERY_SECTION_SIZE: u64 = 6;

const BY_RATING: [SortKey; 2] = [
    (SortField::Rating, SortOrder::Descending),
    (SortField::CreatedAt, SortOrder::Descending),
];
const LATEST_RELEASES: [SortKey; 2] = [
    (SortField::ReleaseDate, SortOrder::Descending),
    (SortField::Rating, SortOrder::Descending),
];
const NEXT_RELEASES: [SortKey; 2] = [
    (SortField::ReleaseDate, SortOrder::Ascending),
    (SortField::Rating, SortOrder::Descending),
];

pub struct SeaOrmCatalogService {
    store: Arc<LazyStore>,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Arc<LazyStore>) -> Self {
        Self { store }
    }

    async fn store(&self) -> Result<&Store, CatalogError> {
        self.store
            .get()
            .await
            .map_err(|e| CatalogError::Database(format!("{e:#}")))
    }

    async fn fetch(store: &Store, id: CatalogItemId) -> Result<CatalogItem, CatalogError> {
        store
            .get_catalog_item(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }
}

/// Sorts genres alphabetically ignoring case, keeping a stable order for
/// spellings that differ only in case.
fn sort_genres(genres: &mut [String]) {
    genres.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
}

#[async_trait::async_trait]
impl CatalogService for SeaOrmCatalogService {
    #[instrument(skip(self))]
    async fn list(
        &self,
        filter: CatalogFilter,
        query: ListQuery,
    ) -> Result<CatalogPage, CatalogError> {
        let store = self.store().await?;
        let ordering = query.ordering();

        let (total, items) = tokio::try_join!(
            store.count_catalog_items(&filter),
            store.find_catalog_items(&filter, &ordering, query.skip(), query.limit),
        )?;

        debug!(total, returned = items.len(), "Listed catalog items");

        Ok(CatalogPage {
            items,
            page: query.page,
            limit: query.limit,
            total,
            total_pages: query.total_pages(total),
            sort_by: query.sort.0.as_str(),
            order: query.sort.1.as_str(),
        })
    }

    #[instrument(skip(self))]
    async fn discover(&self) -> Result<Discovery, CatalogError> {
        let store = self.store().await?;
        let now = Utc::now();

        let everything = CatalogFilter::default();
        let ongoing = CatalogFilter::ongoing();
        let released = CatalogFilter::released_by(now);
        let upcoming = CatalogFilter::upcoming_after(now);

        let (
            hero,
            top_rated,
            trending,
            ongoing_items,
            upcoming_items,
            total,
            ongoing_count,
            upcoming_count,
            mut genres,
        ) = tokio::try_join!(
            store.find_catalog_items(&everything, &BY_RATING, 0, 1),
            store.find_catalog_items(&everything, &BY_RATING, 0, DISCOVERY_SECTION_SIZE),
            store.find_catalog_items(&released, &LATEST_RELEASES, 0, DISCOVERY_SECTION_SIZE),
            store.find_catalog_items(&ongoing, &BY_RATING, 0, DISCOVERY_SECTION_SIZE),
            store.find_catalog_items(&upcoming, &NEXT_RELEASES, 0, DISCOVERY_SECTION_SIZE),
            store.count_catalog_items(&everything),
            store.count_catalog_items(&ongoing),
            store.count_catalog_items(&upcoming),
            store.distinct_genres(),
        )?;

        sort_genres(&mut genres);

        Ok(Discovery {
            hero: hero.into_iter().next(),
            top_rated,
            trending,
            ongoing: ongoing_items,
            upcoming: upcoming_items,
            genres,
            stats: DiscoveryStats {
                total,
                ongoing: ongoing_count,
                upcoming: upcoming_count,
            },
        })
    }

    async fn get(&self, id: CatalogItemId) -> Result<CatalogItem, CatalogError> {
        let store = self.store().await?;
        Self::fetch(store, id).await
    }

    async fn create(&self, input: CatalogItemInput) -> Result<CatalogItem, CatalogError> {
        let record = input.into_record().map_err(CatalogError::Validation)?;
        let store = self.store().await?;

        let id = store.insert_catalog_item(&record).await?;
        metrics::counter!("catalog_items_created_total").increment(1);

        Self::fetch(store, id).await
    }

    async fn update(
        &self,
        id: CatalogItemId,
        patch: CatalogItemInput,
    ) -> Result<CatalogItem, CatalogError> {
        let store = self.store().await?;

        let stored = store
            .get_catalog_item_record(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        let record = patch
            .merge_onto(CatalogItemInput::from(stored))
            .into_record()
            .map_err(CatalogError::Validation)?;

        if !store.update_catalog_item(id, &record).await? {
            return Err(CatalogError::NotFound(id));
        }
        metrics::counter!("catalog_items_updated_total").increment(1);

        Self::fetch(store, id).await
    }

    async fn delete(&self, id: CatalogItemId) -> Result<(), CatalogError> {
        let store = self.store().await?;

        if !store.delete_catalog_item(id).await? {
            return Err(CatalogError::NotFound(id));
        }
        metrics::counter!("catalog_items_deleted_total").increment(1);

        Ok(())
    }
}
