use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::api::validation::parse_provider_id;
use crate::models::{Provider, ProviderInput};

/// `GET /api/v1/studios`, sorted by name.
pub async fn list_providers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Provider>>, ApiError> {
    let providers = state.providers().list().await?;
    Ok(Json(providers))
}

pub async fn get_provider(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Provider>, ApiError> {
    let id = parse_provider_id(&id)?;
    let provider = state.providers().get(id).await?;
    Ok(Json(provider))
}

pub async fn create_provider(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProviderInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Provider>), ApiError> {
    let Json(input) = payload?;
    let provider = state.providers().create(input).await?;
    Ok((StatusCode::CREATED, Json(provider)))
}

pub async fn update_provider(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ProviderInput>, JsonRejection>,
) -> Result<Json<Provider>, ApiError> {
    let id = parse_provider_id(&id)?;
    let Json(patch) = payload?;
    let provider = state.providers().update(id, patch).await?;
    Ok(Json(provider))
}

/// `DELETE /api/v1/studios/{id}`
///
/// Catalog items that referenced the studio keep their dangling reference and
/// render it as `provider: null`.
pub async fn delete_provider(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_provider_id(&id)?;
    state.providers().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
