use std::collections::HashMap;

use super::provider::map_model_to_provider;
use crate::domain::{CatalogItemId, ProviderId, SortField, SortKey};
use crate::entities::{catalog_item_genres, catalog_items, prelude::*, providers};
use crate::models::{CatalogItem, CatalogItemRecord};
use crate::services::catalog_filter::CatalogFilter;
use chrono::Utc;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

pub struct CatalogRepository {
    conn: DatabaseConnection,
}

impl CatalogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model_to_item(
        model: catalog_items::Model,
        provider: Option<providers::Model>,
        genres: Vec<String>,
    ) -> CatalogItem {
        CatalogItem {
            id: CatalogItemId::new(model.id),
            title: model.title,
            description: model.description,
            poster_url: model.poster_url,
            banner_url: model.banner_url,
            trailer_url: model.trailer_url,
            episodes: model.episodes,
            duration_minutes: model.duration_minutes,
            release_date: model.release_date,
            year: model.year,
            season: model.season,
            age_rating: model.age_rating,
            is_ongoing: model.is_ongoing,
            in_library: model.in_library,
            is_favorite: model.is_favorite,
            rating: model.rating,
            genres,
            provider: provider.map(map_model_to_provider),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    fn map_model_to_record(model: catalog_items::Model, genres: Vec<String>) -> CatalogItemRecord {
        CatalogItemRecord {
            title: model.title,
            title_normalized: model.title_normalized,
            description: model.description,
            poster_url: model.poster_url,
            banner_url: model.banner_url,
            trailer_url: model.trailer_url,
            episodes: model.episodes,
            duration_minutes: model.duration_minutes,
            release_date: model.release_date,
            year: model.year,
            season: model.season,
            age_rating: model.age_rating,
            is_ongoing: model.is_ongoing,
            in_library: model.in_library,
            is_favorite: model.is_favorite,
            rating: model.rating,
            genres,
            provider_id: model.provider_id.map(ProviderId::new),
        }
    }

    fn active_model(record: &CatalogItemRecord) -> catalog_items::ActiveModel {
        catalog_items::ActiveModel {
            id: NotSet,
            title: Set(record.title.clone()),
            title_normalized: Set(record.title_normalized.clone()),
            description: Set(record.description.clone()),
            poster_url: Set(record.poster_url.clone()),
            banner_url: Set(record.banner_url.clone()),
            trailer_url: Set(record.trailer_url.clone()),
            episodes: Set(record.episodes),
            duration_minutes: Set(record.duration_minutes),
            release_date: Set(record.release_date),
            year: Set(record.year),
            season: Set(record.season),
            age_rating: Set(record.age_rating),
            is_ongoing: Set(record.is_ongoing),
            in_library: Set(record.in_library),
            is_favorite: Set(record.is_favorite),
            rating: Set(record.rating),
            provider_id: Set(record.provider_id.map(|id| id.value())),
            created_at: NotSet,
            updated_at: Set(Utc::now()),
        }
    }

    const fn sort_column(field: SortField) -> catalog_items::Column {
        match field {
            SortField::CreatedAt => catalog_items::Column::CreatedAt,
            SortField::Rating => catalog_items::Column::Rating,
            SortField::ReleaseDate => catalog_items::Column::ReleaseDate,
            SortField::Title => catalog_items::Column::Title,
            SortField::Episodes => catalog_items::Column::Episodes,
        }
    }

    /// Loads the genres of every given item, in written order.
    async fn genres_for<C: ConnectionTrait>(
        conn: &C,
        ids: Vec<Uuid>,
    ) -> anyhow::Result<HashMap<Uuid, Vec<String>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = CatalogItemGenres::find()
            .filter(catalog_item_genres::Column::ItemId.is_in(ids))
            .order_by_asc(catalog_item_genres::Column::ItemId)
            .order_by_asc(catalog_item_genres::Column::Position)
            .all(conn)
            .await?;

        let mut genres: HashMap<Uuid, Vec<String>> = HashMap::new();
        for row in rows {
            genres.entry(row.item_id).or_default().push(row.genre);
        }
        Ok(genres)
    }

    async fn replace_genres<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
        genres: &[String],
    ) -> anyhow::Result<()> {
        CatalogItemGenres::delete_many()
            .filter(catalog_item_genres::Column::ItemId.eq(id))
            .exec(conn)
            .await?;

        if genres.is_empty() {
            return Ok(());
        }

        let rows = genres
            .iter()
            .enumerate()
            .map(|(position, genre)| catalog_item_genres::ActiveModel {
                item_id: Set(id),
                position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
                genre: Set(genre.clone()),
            });

        CatalogItemGenres::insert_many(rows)
            .exec_without_returning(conn)
            .await?;
        Ok(())
    }

    async fn resolve(
        &self,
        rows: Vec<(catalog_items::Model, Option<providers::Model>)>,
    ) -> anyhow::Result<Vec<CatalogItem>> {
        let ids = rows.iter().map(|(item, _)| item.id).collect();
        let mut genres = Self::genres_for(&self.conn, ids).await?;

        Ok(rows
            .into_iter()
            .map(|(item, provider)| {
                let item_genres = genres.remove(&item.id).unwrap_or_default();
                Self::map_model_to_item(item, provider, item_genres)
            })
            .collect())
    }

    pub async fn count(&self, filter: &CatalogFilter) -> anyhow::Result<u64> {
        Ok(CatalogItems::find()
            .filter(filter.into_condition())
            .count(&self.conn)
            .await?)
    }

    /// Returns one page of matching items with providers and genres resolved.
    /// `ordering` is applied key by key.
    pub async fn find_page(
        &self,
        filter: &CatalogFilter,
        ordering: &[SortKey],
        skip: u64,
        limit: u64,
    ) -> anyhow::Result<Vec<CatalogItem>> {
        let mut select = CatalogItems::find().filter(filter.into_condition());
        for (field, order) in ordering {
            let order = if order.is_ascending() {
                Order::Asc
            } else {
                Order::Desc
            };
            select = select.order_by(Self::sort_column(*field), order);
        }

        let rows = select
            .find_also_related(providers::Entity)
            .offset(skip)
            .limit(limit)
            .all(&self.conn)
            .await?;

        debug!(rows = rows.len(), skip, limit, "Fetched catalog page");
        self.resolve(rows).await
    }

    pub async fn get(&self, id: CatalogItemId) -> anyhow::Result<Option<CatalogItem>> {
        let row = CatalogItems::find_by_id(id.value())
            .find_also_related(providers::Entity)
            .one(&self.conn)
            .await?;

        match row {
            Some(row) => Ok(self.resolve(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn get_record(&self, id: CatalogItemId) -> anyhow::Result<Option<CatalogItemRecord>> {
        let Some(model) = CatalogItems::find_by_id(id.value()).one(&self.conn).await? else {
            return Ok(None);
        };

        let genres = Self::genres_for(&self.conn, vec![model.id])
            .await?
            .remove(&model.id)
            .unwrap_or_default();
        Ok(Some(Self::map_model_to_record(model, genres)))
    }

    pub async fn insert(&self, record: &CatalogItemRecord) -> anyhow::Result<CatalogItemId> {
        let id = CatalogItemId::generate();
        let mut active = Self::active_model(record);
        active.id = Set(id.value());
        active.created_at = active.updated_at.clone();

        let txn = self.conn.begin().await?;
        CatalogItems::insert(active)
            .exec_without_returning(&txn)
            .await?;
        Self::replace_genres(&txn, id.value(), &record.genres).await?;
        txn.commit().await?;

        info!(item_id = %id, title = %record.title, "Created catalog item");
        Ok(id)
    }

    pub async fn update(
        &self,
        id: CatalogItemId,
        record: &CatalogItemRecord,
    ) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await?;
        let result = CatalogItems::update_many()
            .set(Self::active_model(record))
            .filter(catalog_items::Column::Id.eq(id.value()))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        Self::replace_genres(&txn, id.value(), &record.genres).await?;
        txn.commit().await?;

        info!(item_id = %id, "Updated catalog item");
        Ok(true)
    }

    pub async fn delete(&self, id: CatalogItemId) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await?;

        CatalogItemGenres::delete_many()
            .filter(catalog_item_genres::Column::ItemId.eq(id.value()))
            .exec(&txn)
            .await?;

        let result = CatalogItems::delete_by_id(id.value()).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!(item_id = %id, "Deleted catalog item");
        }
        Ok(removed)
    }

    /// Every distinct genre in use, unsorted.
    pub async fn distinct_genres(&self) -> anyhow::Result<Vec<String>> {
        Ok(CatalogItemGenres::find()
            .select_only()
            .column(catalog_item_genres::Column::Genre)
            .distinct()
            .into_tuple::<String>()
            .all(&self.conn)
            .await?)
    }

    pub async fn clear(&self) -> anyhow::Result<u64> {
        let txn = self.conn.begin().await?;
        CatalogItemGenres::delete_many().exec(&txn).await?;
        let result = CatalogItems::delete_many().exec(&txn).await?;
        txn.commit().await?;
        Ok(result.rows_affected)
    }
}
