use std::sync::Arc;

use crate::config::Config;
use crate::db::{LazyStore, Store};
use crate::services::{
    CatalogService, ProviderService, SeaOrmCatalogService, SeaOrmProviderService,
};

/// Everything request handlers and CLI commands share.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Arc<LazyStore>,

    pub catalog_service: Arc<dyn CatalogService>,

    pub provider_service: Arc<dyn ProviderService>,
}

impl SharedState {
    /// Builds the state without touching the database; the first request
    /// connects.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let store = Arc::new(LazyStore::new(
            config.database_url(),
            config.general.max_db_connections,
            config.general.min_db_connections,
        ));
        Self::with_store(config, store)
    }

    /// Builds the state around an already connected store.
    #[must_use]
    pub fn with_connected_store(config: Config, store: Store) -> Self {
        Self::with_store(config, Arc::new(LazyStore::ready(store)))
    }

    fn with_store(config: Config, store: Arc<LazyStore>) -> Self {
        let catalog_service: Arc<dyn CatalogService> =
            Arc::new(SeaOrmCatalogService::new(store.clone()));
        let provider_service: Arc<dyn ProviderService> =
            Arc::new(SeaOrmProviderService::new(store.clone()));

        Self {
            config: Arc::new(config),
            store,
            catalog_service,
            provider_service,
        }
    }
}
