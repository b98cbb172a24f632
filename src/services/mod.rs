pub mod catalog_filter;
pub use catalog_filter::{CatalogFilter, ListParams};

pub mod catalog_service;
pub use catalog_service::{CatalogError, CatalogService, ListQuery};

pub mod catalog_service_impl;
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod provider_service;
pub use provider_service::{ProviderError, ProviderService};

pub mod provider_service_impl;
pub use provider_service_impl::SeaOrmProviderService;

pub mod seed;
pub use seed::{CatalogSeeder, SeedSummary};
