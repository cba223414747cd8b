//! `/spreads/*` routes (spec §6), plus the supplemented on-demand compare
//! endpoints (SPEC_FULL §B).

use crate::error::ApiError;
use crate::state::AppState;
use arbspread_config::{Exchange, Interval};
use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

fn parse_interval(raw: Option<&str>) -> Result<Interval, ApiError> {
    match raw {
        None => Ok(Interval::OneHour),
        Some(s) => Interval::from_str(s).map_err(|err| ApiError::BadRequest(err.to_string())),
    }
}

fn parse_exchanges(raw: &Option<Vec<String>>) -> Result<Option<Vec<Exchange>>, ApiError> {
    match raw {
        None => Ok(None),
        Some(names) => {
            let exchanges = names
                .iter()
                .map(|name| Exchange::from_str(name).map_err(|_| ApiError::BadRequest(format!("unknown exchange `{name}`"))))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(exchanges))
        }
    }
}

/// `POST /spreads/init-pairs` (spec §6): populates the catalog from every
/// supported exchange's market listing.
pub async fn init_pairs(State(state): State<AppState>) -> Result<Json<bool>, ApiError> {
    state.engine.init_pairs(&Exchange::ALL).await?;
    Ok(Json(true))
}

#[derive(Debug, Deserialize)]
pub struct ComputeAllQuery {
    pub interval: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ComputeAllResponse {
    pub status: &'static str,
    pub message: String,
}

/// `POST /spreads/compute-all` (spec §6): kicks off §4.5 as a background
/// task and returns immediately — the caller polls `GET
/// /spreads/batch-status` for progress.
pub async fn compute_all(
    State(state): State<AppState>,
    Query(query): Query<ComputeAllQuery>,
) -> Result<Json<ComputeAllResponse>, ApiError> {
    let interval = parse_interval(query.interval.as_deref())?;
    let engine = state.engine.clone();
    tokio::spawn(async move {
        if let Err(err) = engine.compute_all(interval).await {
            tracing::error!(error = %err, "batch compute run failed");
        }
    });
    Ok(Json(ComputeAllResponse {
        status: "started",
        message: format!("batch compute started for interval {interval}"),
    }))
}

#[derive(Debug, Serialize)]
pub struct BatchStatusResponse {
    pub total_pairs: i64,
    pub cached: i64,
    pub spreads_computed: i64,
    pub processing_progress_pct: f64,
}

/// `GET /spreads/batch-status` (spec §6).
pub async fn batch_status(State(state): State<AppState>) -> Result<Json<BatchStatusResponse>, ApiError> {
    let status = state.engine.catalog().batch_status().await?;
    Ok(Json(BatchStatusResponse {
        total_pairs: status.total_pairs,
        cached: status.cached,
        spreads_computed: status.spreads_computed,
        processing_progress_pct: status.processing_progress_pct(),
    }))
}

#[derive(Debug, Serialize)]
pub struct ComputedSpreadResponse {
    pub pair_name: String,
    pub time: DateTime<Utc>,
    pub high_exchange: Exchange,
    pub low_exchange: Exchange,
    pub spread_percent: f64,
}

/// `GET /spreads/computed` (spec §6): all `SpreadMax` rows joined out to
/// names, ordered by `spread_percent` descending.
pub async fn computed(State(state): State<AppState>) -> Result<Json<Vec<ComputedSpreadResponse>>, ApiError> {
    let rows = state.engine.catalog().computed_spreads().await?;
    Ok(Json(
        rows.into_iter()
            .map(|row| ComputedSpreadResponse {
                pair_name: row.pair_name,
                time: row.time,
                high_exchange: row.high_exchange,
                low_exchange: row.low_exchange,
                spread_percent: row.spread_percent,
            })
            .collect(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub pair_name: String,
    pub exchanges: Option<Vec<String>>,
    pub interval: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BucketSpreadResponse {
    pub time: DateTime<Utc>,
    pub spread_percent: f64,
    pub high_exchange: Exchange,
    pub low_exchange: Exchange,
}

/// `POST /spreads/per-ticker/all` (SPEC_FULL §B): the full per-bucket
/// spread series for one pair across a caller-chosen exchange subset.
/// `null` when the pair isn't in the catalog at all.
pub async fn compare_all(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<Option<Vec<BucketSpreadResponse>>>, ApiError> {
    let interval = parse_interval(request.interval.as_deref())?;
    let exchanges = parse_exchanges(&request.exchanges)?;
    let rows = state.engine.compare_all(&request.pair_name, exchanges.as_deref(), interval).await?;
    Ok(Json(rows.map(|buckets| {
        buckets
            .into_iter()
            .map(|b| BucketSpreadResponse {
                time: b.time,
                spread_percent: b.spread_percent,
                high_exchange: b.high_exchange,
                low_exchange: b.low_exchange,
            })
            .collect()
    })))
}

/// `POST /spreads/per-ticker/max` (SPEC_FULL §B): just the maximum-spread
/// bucket of [`compare_all`].
pub async fn compare_max(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<Option<BucketSpreadResponse>>, ApiError> {
    let interval = parse_interval(request.interval.as_deref())?;
    let exchanges = parse_exchanges(&request.exchanges)?;
    let bucket = state.engine.compare_max(&request.pair_name, exchanges.as_deref(), interval).await?;
    Ok(Json(bucket.map(|b| BucketSpreadResponse {
        time: b.time,
        spread_percent: b.spread_percent,
        high_exchange: b.high_exchange,
        low_exchange: b.low_exchange,
    })))
}
