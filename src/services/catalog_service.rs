//! Domain service for the catalog: listing, discovery and single-item
//! operations.

use crate::api::types::{CatalogPage, Discovery};
use crate::db::unique_violation_field;
use crate::domain::{CatalogItemId, SortField, SortKey, SortOrder};
use crate::models::{CatalogItem, CatalogItemInput};
use crate::services::catalog_filter::{CatalogFilter, ListParams, parse_count};
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Domain errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Anime not found")]
    NotFound(CatalogItemId),

    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Duplicated value for {field}")]
    Conflict { field: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        match unique_violation_field(&err) {
            Some(field) => Self::Conflict { field },
            None => Self::Database(format!("{err:#}")),
        }
    }
}

/// Sanitized pagination and ordering of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u64,
    pub limit: u64,
    pub sort: SortKey,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            sort: (SortField::default(), SortOrder::default()),
        }
    }
}

impl ListQuery {
    /// Reads `page`, `limit`, `sortBy` and `order`. Out-of-range values are
    /// clamped, unparseable ones fall back to the defaults, and `limit` never
    /// exceeds `max_limit`.
    #[must_use]
    pub fn from_params(params: &ListParams, max_limit: u64) -> Self {
        let page = params
            .page
            .as_deref()
            .and_then(parse_count)
            .map_or(1, |page| page.max(1));

        let limit = params
            .limit
            .as_deref()
            .and_then(parse_count)
            .map_or(DEFAULT_PAGE_SIZE, |limit| limit.max(1))
            .min(max_limit.max(1));

        Self {
            page,
            limit,
            sort: (
                SortField::from_param(params.sort_by.as_deref()),
                SortOrder::from_param(params.order.as_deref()),
            ),
        }
    }

    /// Rows before the page, capped at what SQLite accepts as an offset.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        let skip = self.page.saturating_sub(1).saturating_mul(self.limit);
        let max = i64::MAX.unsigned_abs();
        if skip > max { max } else { skip }
    }

    /// At least one page, even when nothing matched.
    #[must_use]
    pub const fn total_pages(&self, total: u64) -> u64 {
        let limit = if self.limit == 0 { 1 } else { self.limit };
        let pages = total.div_ceil(limit);
        if pages == 0 { 1 } else { pages }
    }

    /// The requested key, followed by newest-first unless that is already
    /// the requested key.
    #[must_use]
    pub fn ordering(&self) -> Vec<SortKey> {
        let mut keys = vec![self.sort];
        if self.sort.0 != SortField::CreatedAt {
            keys.push((SortField::CreatedAt, SortOrder::Descending));
        }
        keys
    }
}

/// Domain service trait for catalog items.
///
/// # Examples
///
/// ```rust,ignore
/// use anicat::services::{CatalogError, CatalogService};
/// use anicat::domain::CatalogItemId;
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn CatalogService>, id: CatalogItemId) -> Result<(), CatalogError> {
///     let item = service.get(id).await?;
///     println!("{}", item.title);
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Returns one page of items matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Database`] on connection failures.
    async fn list(
        &self,
        filter: CatalogFilter,
        query: ListQuery,
    ) -> Result<CatalogPage, CatalogError>;

    /// Builds the discovery overview. Fails as a whole if any part fails.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Database`] on connection failures.
    async fn discover(&self) -> Result<Discovery, CatalogError>;

    /// # Errors
    ///
    /// - Returns [`CatalogError::NotFound`] if the item does not exist
    /// - Returns [`CatalogError::Database`] on connection failures
    async fn get(&self, id: CatalogItemId) -> Result<CatalogItem, CatalogError>;

    /// # Errors
    ///
    /// - Returns [`CatalogError::Validation`] with every violated constraint
    /// - Returns [`CatalogError::Conflict`] if the title is already taken
    async fn create(&self, input: CatalogItemInput) -> Result<CatalogItem, CatalogError>;

    /// Applies `patch` over the stored item and re-validates the result.
    ///
    /// # Errors
    ///
    /// - Returns [`CatalogError::NotFound`] if the item does not exist
    /// - Returns [`CatalogError::Validation`] with every violated constraint
    /// - Returns [`CatalogError::Conflict`] if the new title is already taken
    async fn update(
        &self,
        id: CatalogItemId,
        patch: CatalogItemInput,
    ) -> Result<CatalogItem, CatalogError>;

    /// # Errors
    ///
    /// - Returns [`CatalogError::NotFound`] if the item does not exist
    /// - Returns [`CatalogError::Database`] on connection failures
    async fn delete(&self, id: CatalogItemId) -> Result<(), CatalogError>;
}
