//! `SeaORM` implementation of the [`ProviderService`] trait.

use crate::db::{LazyStore, Store};
use crate::domain::ProviderId;
use crate::models::{Provider, ProviderInput};
use crate::services::provider_service::{ProviderError, ProviderService};
use std::sync::Arc;

pub struct SeaOrmProviderService {
    store: Arc<LazyStore>,
}

impl SeaOrmProviderService {
    #[must_use]
    pub const fn new(store: Arc<LazyStore>) -> Self {
        Self { store }
    }

    async fn store(&self) -> Result<&Store, ProviderError> {
        self.store
            .get()
            .await
            .map_err(|e| ProviderError::Database(format!("{e:#}")))
    }

    async fn fetch(store: &Store, id: ProviderId) -> Result<Provider, ProviderError> {
        store
            .get_provider(id)
            .await?
            .ok_or(ProviderError::NotFound(id))
    }
}

#[async_trait::async_trait]
impl ProviderService for SeaOrmProviderService {
    async fn list(&self) -> Result<Vec<Provider>, ProviderError> {
        Ok(self.store().await?.list_providers().await?)
    }

    async fn get(&self, id: ProviderId) -> Result<Provider, ProviderError> {
        let store = self.store().await?;
        Self::fetch(store, id).await
    }

    async fn create(&self, input: ProviderInput) -> Result<Provider, ProviderError> {
        let record = input.into_record().map_err(ProviderError::Validation)?;
        let store = self.store().await?;

        let id = store.insert_provider(&record).await?;
        metrics::counter!("providers_created_total").increment(1);

        Self::fetch(store, id).await
    }

    async fn update(
        &self,
        id: ProviderId,
        patch: ProviderInput,
    ) -> Result<Provider, ProviderError> {
        let store = self.store().await?;

        let stored = store
            .get_provider_record(id)
            .await?
            .ok_or(ProviderError::NotFound(id))?;

        let record = patch
            .merge_onto(ProviderInput::from(stored))
            .into_record()
            .map_err(ProviderError::Validation)?;

        if !store.update_provider(id, &record).await? {
            return Err(ProviderError::NotFound(id));
        }

        Self::fetch(store, id).await
    }

    async fn delete(&self, id: ProviderId) -> Result<(), ProviderError> {
        let store = self.store().await?;

        if !store.delete_provider(id).await? {
            return Err(ProviderError::NotFound(id));
        }
        metrics::counter!("providers_deleted_total").increment(1);

        Ok(())
    }
}
