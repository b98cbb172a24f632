pub mod catalog;
pub mod input;
pub mod provider;

pub use catalog::{AgeRating, CatalogItem, CatalogItemInput, CatalogItemRecord, Season};
pub use provider::{Provider, ProviderInput, ProviderRecord};
