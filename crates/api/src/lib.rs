//! HTTP surface (spec §6). Out of scope for the core pipeline (spec §1
//! calls the HTTP entrypoint and CORS glue "external collaborators"), but
//! SPEC_FULL's module map assigns this crate the job of actually serving
//! it — the core's persisted outputs need a surface to read through.

mod error;
mod routes;
mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the full router (spec §6's table plus the SPEC_FULL §B
/// supplements). CORS is permissive by default — there is no
/// authentication model in this system (spec §1 Non-goals), so the
/// pipeline's read endpoints are safe to expose broadly to the frontend
/// that consumes them.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/spreads/init-pairs", post(routes::spreads::init_pairs))
        .route("/spreads/compute-all", post(routes::spreads::compute_all))
        .route("/spreads/batch-status", get(routes::spreads::batch_status))
        .route("/spreads/computed", get(routes::spreads::computed))
        .route("/spreads/per-ticker/all", post(routes::spreads::compare_all))
        .route("/spreads/per-ticker/max", post(routes::spreads::compare_max))
        .route("/static/config/:config_type", get(routes::static_config::get_config))
        .route("/cache/status", get(routes::cache::status))
        .route("/cache/clear", post(routes::cache::clear))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
