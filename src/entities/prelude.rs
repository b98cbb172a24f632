pub use super::catalog_item_genres::Entity as CatalogItemGenres;
pub use super::catalog_items::Entity as CatalogItems;
pub use super::providers::Entity as Providers;
