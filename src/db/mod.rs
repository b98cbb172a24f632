use crate::domain::{CatalogItemId, ProviderId, SortKey};
use crate::models::{CatalogItem, CatalogItemRecord, Provider, ProviderRecord};
use crate::services::catalog_filter::CatalogFilter;
use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr, Statement,
};
use std::path::Path;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::info;

pub mod migrator;
pub mod repositories;

/// Recycling the only connection would drop an in-memory database.
const IN_MEMORY_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365);

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let db_url = db_url.trim();
        let file = sqlite_file_path(db_url);

        if let Some(path_str) = file {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every connection to `:memory:` opens a separate database.
        let (max_connections, min_connections) = if file.is_none() {
            (1, 1)
        } else {
            (max_connections.max(1), min_connections.min(max_connections))
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if file.is_none() {
            opt.idle_timeout(IN_MEMORY_LIFETIME)
                .max_lifetime(IN_MEMORY_LIFETIME);
        } else {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn catalog_repo(&self) -> repositories::catalog::CatalogRepository {
        repositories::catalog::CatalogRepository::new(self.conn.clone())
    }

    fn provider_repo(&self) -> repositories::provider::ProviderRepository {
        repositories::provider::ProviderRepository::new(self.conn.clone())
    }

    pub async fn count_catalog_items(&self, filter: &CatalogFilter) -> Result<u64> {
        self.catalog_repo().count(filter).await
    }

    pub async fn find_catalog_items(
        &self,
        filter: &CatalogFilter,
        ordering: &[SortKey],
        skip: u64,
        limit: u64,
    ) -> Result<Vec<CatalogItem>> {
        self.catalog_repo()
            .find_page(filter, ordering, skip, limit)
            .await
    }

    pub async fn get_catalog_item(&self, id: CatalogItemId) -> Result<Option<CatalogItem>> {
        self.catalog_repo().get(id).await
    }

    pub async fn get_catalog_item_record(
        &self,
        id: CatalogItemId,
    ) -> Result<Option<CatalogItemRecord>> {
        self.catalog_repo().get_record(id).await
    }

    pub async fn insert_catalog_item(&self, record: &CatalogItemRecord) -> Result<CatalogItemId> {
        self.catalog_repo().insert(record).await
    }

    pub async fn update_catalog_item(
        &self,
        id: CatalogItemId,
        record: &CatalogItemRecord,
    ) -> Result<bool> {
        self.catalog_repo().update(id, record).await
    }

    pub async fn delete_catalog_item(&self, id: CatalogItemId) -> Result<bool> {
        self.catalog_repo().delete(id).await
    }

    pub async fn distinct_genres(&self) -> Result<Vec<String>> {
        self.catalog_repo().distinct_genres().await
    }

    pub async fn clear_catalog_items(&self) -> Result<u64> {
        self.catalog_repo().clear().await
    }

    pub async fn list_providers(&self) -> Result<Vec<Provider>> {
        self.provider_repo().list().await
    }

    pub async fn get_provider(&self, id: ProviderId) -> Result<Option<Provider>> {
        self.provider_repo().get(id).await
    }

    pub async fn get_provider_record(&self, id: ProviderId) -> Result<Option<ProviderRecord>> {
        self.provider_repo().get_record(id).await
    }

    pub async fn insert_provider(&self, record: &ProviderRecord) -> Result<ProviderId> {
        self.provider_repo().insert(record).await
    }

    pub async fn update_provider(&self, id: ProviderId, record: &ProviderRecord) -> Result<bool> {
        self.provider_repo().update(id, record).await
    }

    pub async fn delete_provider(&self, id: ProviderId) -> Result<bool> {
        self.provider_repo().delete(id).await
    }

    pub async fn count_providers(&self) -> Result<u64> {
        self.provider_repo().count().await
    }

    pub async fn clear_providers(&self) -> Result<u64> {
        self.provider_repo().clear().await
    }
}

/// A [`Store`] that connects on first use.
///
/// Concurrent first callers share one connection attempt. A failed attempt
/// leaves the cell empty, so the next caller tries again.
pub struct LazyStore {
    db_url: String,
    max_connections: u32,
    min_connections: u32,
    cell: OnceCell<Store>,
}

impl LazyStore {
    #[must_use]
    pub fn new(db_url: impl Into<String>, max_connections: u32, min_connections: u32) -> Self {
        Self {
            db_url: db_url.into(),
            max_connections,
            min_connections,
            cell: OnceCell::new(),
        }
    }

    /// Wraps an already connected store.
    #[must_use]
    pub fn ready(store: Store) -> Self {
        Self {
            db_url: String::new(),
            max_connections: 1,
            min_connections: 1,
            cell: OnceCell::new_with(Some(store)),
        }
    }

    pub async fn get(&self) -> Result<&Store> {
        self.cell
            .get_or_try_init(|| {
                Store::with_pool_options(&self.db_url, self.max_connections, self.min_connections)
            })
            .await
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

/// Returns the on-disk path of a SQLite URL, or `None` for in-memory
/// databases.
fn sqlite_file_path(db_url: &str) -> Option<&str> {
    let rest = db_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = rest.split_once('?').map_or(rest, |(path, _)| path);

    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(path)
    }
}

/// Extracts the camelCase name of the column behind a unique constraint
/// violation, if `err` is one.
#[must_use]
pub fn unique_violation_field(err: &anyhow::Error) -> Option<String> {
    let db_err = err.downcast_ref::<DbErr>()?;
    match db_err.sql_err()? {
        SqlErr::UniqueConstraintViolation(message) => Some(field_from_message(&message)),
        _ => None,
    }
}

// SQLite reports "UNIQUE constraint failed: table.column".
fn field_from_message(message: &str) -> String {
    let tail = message.rsplit(':').next().unwrap_or(message);
    let column = tail.split(',').next().unwrap_or(tail).trim();
    let column = column.rsplit('.').next().unwrap_or(column);
    if column.is_empty() {
        return "field".to_string();
    }
    to_camel_case(column)
}

fn to_camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
