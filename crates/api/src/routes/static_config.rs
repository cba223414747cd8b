//! `GET /static/config/{type}` (spec §6): fixed enumerations for the
//! frontend (time ranges, supported pairs, exchanges).

use crate::error::ApiError;
use arbspread_config::static_data;
use axum::extract::Path;
use axum::Json;
use serde_json::Value;

pub async fn get_config(Path(config_type): Path<String>) -> Result<Json<Value>, ApiError> {
    static_data::lookup(&config_type)
        .map(Json)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown config type `{config_type}`")))
}
