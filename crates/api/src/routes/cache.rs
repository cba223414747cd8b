//! `/cache/*` routes (SPEC_FULL §B): read-only and administrative cache
//! introspection layered over C4.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CacheStatusResponse {
    pub reachable: bool,
}

pub async fn status(State(state): State<AppState>) -> Json<CacheStatusResponse> {
    let reachable = state.engine.cache().is_reachable().await;
    Json(CacheStatusResponse { reachable })
}

#[derive(Debug, Serialize)]
pub struct CacheClearResponse {
    pub cleared: u64,
}

pub async fn clear(State(state): State<AppState>) -> Result<Json<CacheClearResponse>, ApiError> {
    let cleared = state.engine.cache().clear_all().await.map_err(|err| ApiError::Internal(err.into()))?;
    Ok(Json(CacheClearResponse { cleared }))
}
