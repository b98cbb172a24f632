use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Tables are declared by hand so that `catalog_items.provider_id` stays a
// plain column without a foreign key.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Providers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Providers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Providers::Name).string().not_null())
                    .col(ColumnDef::new(Providers::NameNormalized).string().not_null())
                    .col(ColumnDef::new(Providers::Country).string().null())
                    .col(
                        ColumnDef::new(Providers::FoundedDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Providers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Providers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Providers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_providers_name_normalized")
                    .table(Providers::Table)
                    .col(Providers::NameNormalized)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CatalogItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CatalogItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CatalogItems::Title).string().not_null())
                    .col(
                        ColumnDef::new(CatalogItems::TitleNormalized)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CatalogItems::Description).text().not_null())
                    .col(ColumnDef::new(CatalogItems::PosterUrl).string().not_null())
                    .col(ColumnDef::new(CatalogItems::BannerUrl).string().null())
                    .col(ColumnDef::new(CatalogItems::TrailerUrl).string().null())
                    .col(ColumnDef::new(CatalogItems::Episodes).integer().not_null())
                    .col(ColumnDef::new(CatalogItems::DurationMinutes).integer().null())
                    .col(
                        ColumnDef::new(CatalogItems::ReleaseDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CatalogItems::Year).integer().not_null())
                    .col(ColumnDef::new(CatalogItems::Season).string().null())
                    .col(ColumnDef::new(CatalogItems::AgeRating).string().null())
                    .col(ColumnDef::new(CatalogItems::IsOngoing).boolean().not_null())
                    .col(
                        ColumnDef::new(CatalogItems::InLibrary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CatalogItems::IsFavorite)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(CatalogItems::Rating).double().not_null())
                    .col(ColumnDef::new(CatalogItems::ProviderId).uuid().null())
                    .col(
                        ColumnDef::new(CatalogItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CatalogItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_catalog_items_title_normalized")
                    .table(CatalogItems::Table)
                    .col(CatalogItems::TitleNormalized)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_catalog_items_provider_id")
                    .table(CatalogItems::Table)
                    .col(CatalogItems::ProviderId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CatalogItemGenres::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CatalogItemGenres::ItemId).uuid().not_null())
                    .col(
                        ColumnDef::new(CatalogItemGenres::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CatalogItemGenres::Genre).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(CatalogItemGenres::ItemId)
                            .col(CatalogItemGenres::Position),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_catalog_item_genres_genre")
                    .table(CatalogItemGenres::Table)
                    .col(CatalogItemGenres::Genre)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CatalogItemGenres::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CatalogItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Providers::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Providers {
    Table,
    Id,
    Name,
    NameNormalized,
    Country,
    FoundedDate,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CatalogItems {
    Table,
    Id,
    Title,
    TitleNormalized,
    Description,
    PosterUrl,
    BannerUrl,
    TrailerUrl,
    Episodes,
    DurationMinutes,
    ReleaseDate,
    Year,
    Season,
    AgeRating,
    IsOngoing,
    InLibrary,
    IsFavorite,
    Rating,
    ProviderId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CatalogItemGenres {
    Table,
    ItemId,
    Position,
    Genre,
}
