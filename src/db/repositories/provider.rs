use crate::domain::ProviderId;
use crate::entities::{prelude::*, providers};
use crate::models::{Provider, ProviderRecord};
use chrono::Utc;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;

pub struct ProviderRepository {
    conn: DatabaseConnection,
}

pub(super) fn map_model_to_provider(model: providers::Model) -> Provider {
    Provider {
        id: ProviderId::new(model.id),
        name: model.name,
        country: model.country,
        founded_date: model.founded_date,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

impl ProviderRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model_to_record(model: providers::Model) -> ProviderRecord {
        ProviderRecord {
            name: model.name,
            name_normalized: model.name_normalized,
            country: model.country,
            founded_date: model.founded_date,
            is_active: model.is_active,
        }
    }

    fn active_model(record: &ProviderRecord) -> providers::ActiveModel {
        providers::ActiveModel {
            id: NotSet,
            name: Set(record.name.clone()),
            name_normalized: Set(record.name_normalized.clone()),
            country: Set(record.country.clone()),
            founded_date: Set(record.founded_date),
            is_active: Set(record.is_active),
            created_at: NotSet,
            updated_at: Set(Utc::now()),
        }
    }

    pub async fn list(&self) -> anyhow::Result<Vec<Provider>> {
        let rows = Providers::find()
            .order_by_asc(providers::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(map_model_to_provider).collect())
    }

    pub async fn get(&self, id: ProviderId) -> anyhow::Result<Option<Provider>> {
        let row = Providers::find_by_id(id.value()).one(&self.conn).await?;
        Ok(row.map(map_model_to_provider))
    }

    pub async fn get_record(&self, id: ProviderId) -> anyhow::Result<Option<ProviderRecord>> {
        let row = Providers::find_by_id(id.value()).one(&self.conn).await?;
        Ok(row.map(Self::map_model_to_record))
    }

    pub async fn insert(&self, record: &ProviderRecord) -> anyhow::Result<ProviderId> {
        let id = ProviderId::generate();
        let mut active = Self::active_model(record);
        active.id = Set(id.value());
        active.created_at = active.updated_at.clone();

        Providers::insert(active)
            .exec_without_returning(&self.conn)
            .await?;

        info!(provider_id = %id, name = %record.name, "Created provider");
        Ok(id)
    }

    pub async fn update(&self, id: ProviderId, record: &ProviderRecord) -> anyhow::Result<bool> {
        let result = Providers::update_many()
            .set(Self::active_model(record))
            .filter(providers::Column::Id.eq(id.value()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Deletes the provider only. Items that reference it keep the id.
    pub async fn delete(&self, id: ProviderId) -> anyhow::Result<bool> {
        let result = Providers::delete_by_id(id.value()).exec(&self.conn).await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!(provider_id = %id, "Deleted provider");
        }
        Ok(removed)
    }

    pub async fn count(&self) -> anyhow::Result<u64> {
        Ok(Providers::find().count(&self.conn).await?)
    }

    pub async fn clear(&self) -> anyhow::Result<u64> {
        let result = Providers::delete_many().exec(&self.conn).await?;
        Ok(result.rows_affected)
    }
}
