use crate::models::{AgeRating, Season};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "catalog_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub title_normalized: String,
    pub description: String,
    pub poster_url: String,
    pub banner_url: Option<String>,
    pub trailer_url: Option<String>,
    pub episodes: i32,
    pub duration_minutes: Option<i32>,
    pub release_date: DateTimeUtc,
    pub year: i32,
    pub season: Option<Season>,
    pub age_rating: Option<AgeRating>,
    pub is_ongoing: bool,
    pub in_library: bool,
    pub is_favorite: bool,
    pub rating: f64,
    /// Weak reference; the provider row may no longer exist.
    pub provider_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::providers::Entity",
        from = "Column::ProviderId",
        to = "super::providers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Providers,
    #[sea_orm(has_many = "super::catalog_item_genres::Entity")]
    Genres,
}

impl Related<super::providers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Providers.def()
    }
}

impl Related<super::catalog_item_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Genres.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
