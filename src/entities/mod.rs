pub mod prelude;

pub mod catalog_item_genres;
pub mod catalog_items;
pub mod providers;
