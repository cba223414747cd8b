//! Error taxonomy at the API boundary (spec §7): validation failures become
//! `400`, everything else the core layers surface becomes `500`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Unknown interval, exchange, or config type (spec §7).
    BadRequest(String),
    /// Anything else — gateway-wrapped internal errors (catalog, cache,
    /// task runtime). Rare; indicates a defect (spec §7).
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<arbspread_catalog::CatalogError> for ApiError {
    fn from(err: arbspread_catalog::CatalogError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "unexpected internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
