use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, AppState, CatalogPage, Discovery};
use crate::api::validation::parse_item_id;
use crate::models::{CatalogItem, CatalogItemInput};
use crate::services::{CatalogFilter, ListParams, ListQuery};

/// `GET /api/v1/animes`
///
/// Filters, sorts and paginates the catalog. Query values that cannot be
/// understood, including repeated keys, are ignored rather than rejected.
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<CatalogPage>, ApiError> {
    let Query(pairs) = pairs?;
    let params = ListParams::from_pairs(pairs);

    let filter = CatalogFilter::from_params(&params);
    let query = ListQuery::from_params(&params, state.config().server.max_page_size);

    let page = state.catalog().list(filter, query).await?;
    Ok(Json(page))
}

/// `GET /api/v1/animes/discover`
pub async fn discover(State(state): State<Arc<AppState>>) -> Result<Json<Discovery>, ApiError> {
    let discovery = state.catalog().discover().await?;
    Ok(Json(discovery))
}

pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CatalogItem>, ApiError> {
    let id = parse_item_id(&id)?;
    let item = state.catalog().get(id).await?;
    Ok(Json(item))
}

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CatalogItemInput>, JsonRejection>,
) -> Result<(StatusCode, Json<CatalogItem>), ApiError> {
    let Json(input) = payload?;
    let item = state.catalog().create(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PATCH /api/v1/animes/{id}`
///
/// Only the fields present in the body change; `null` clears optional ones.
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<CatalogItemInput>, JsonRejection>,
) -> Result<Json<CatalogItem>, ApiError> {
    let id = parse_item_id(&id)?;
    let Json(patch) = payload?;
    let item = state.catalog().update(id, patch).await?;
    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_item_id(&id)?;
    state.catalog().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
