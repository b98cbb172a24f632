//! Domain service for providers (studios).

use crate::db::unique_violation_field;
use crate::domain::ProviderId;
use crate::models::{Provider, ProviderInput};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Studio not found")]
    NotFound(ProviderId),

    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Duplicated value for {field}")]
    Conflict { field: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for ProviderError {
    fn from(err: anyhow::Error) -> Self {
        match unique_violation_field(&err) {
            Some(field) => Self::Conflict { field },
            None => Self::Database(format!("{err:#}")),
        }
    }
}

#[async_trait::async_trait]
pub trait ProviderService: Send + Sync {
    /// All providers, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Database`] on connection failures.
    async fn list(&self) -> Result<Vec<Provider>, ProviderError>;

    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`] if the provider does not exist.
    async fn get(&self, id: ProviderId) -> Result<Provider, ProviderError>;

    /// # Errors
    ///
    /// - Returns [`ProviderError::Validation`] with every violated constraint
    /// - Returns [`ProviderError::Conflict`] if the name is already taken
    async fn create(&self, input: ProviderInput) -> Result<Provider, ProviderError>;

    /// # Errors
    ///
    /// - Returns [`ProviderError::NotFound`] if the provider does not exist
    /// - Returns [`ProviderError::Validation`] with every violated constraint
    /// - Returns [`ProviderError::Conflict`] if the new name is already taken
    async fn update(&self, id: ProviderId, patch: ProviderInput)
    -> Result<Provider, ProviderError>;

    /// Removes the provider. Catalog items that reference it are left as
    /// they are.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`] if the provider does not exist.
    async fn delete(&self, id: ProviderId) -> Result<(), ProviderError>;
}
