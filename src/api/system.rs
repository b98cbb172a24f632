//! Service-level endpoints: banner, liveness, readiness and the fallback for
//! unknown routes.

use axum::{
    Json,
    extract::{OriginalUri, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, AppState, HealthResponse, ReadinessResponse, RootResponse};

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        ok: true,
        message: "Anime Catalog API is running",
        health: "/api/v1/health",
    })
}

/// Liveness only; never touches the database.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// `GET /api/v1/health/ready`
///
/// Connects on first use and pings the database. Answers 503 while the
/// database is unreachable.
pub async fn readiness(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let database = match state.shared.store.get().await {
        Ok(store) => store.ping().await.is_ok(),
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "Readiness check failed to connect");
            false
        }
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            ok: database,
            database,
        }),
    )
}

pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path(), |pq| pq.as_str());
    ApiError::NotFound(format!("Not found - {target}"))
}
