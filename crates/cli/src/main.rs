//! `arbspread-node`: wires configuration, the persistent catalog, the
//! cache layer, the exchange gateway, the task runtime, the batch engine,
//! and the HTTP surface together, then serves the HTTP surface until the
//! process is asked to shut down.

use anyhow::Context;
use arbspread_api::AppState;
use arbspread_cache::Cache;
use arbspread_catalog::Catalog;
use arbspread_common::observability::{self, LogFormat};
use arbspread_config::Settings;
use arbspread_engine::{Engine, EngineSettings};
use arbspread_gateway::ExchangeGateway;
use arbspread_runtime::Runtime;
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    observability::init(LogFormat::Text);

    tracing::info!(port = settings.port, "arbspread-node starting up");

    let pool = arbspread_catalog::connect(&settings.postgres_url())
        .await
        .context("failed to connect to postgres / run migrations")?;
    let catalog = Catalog::new(pool);

    let cache = Arc::new(Cache::new(&settings.redis_url()).context("failed to build redis client")?);

    let http = reqwest::Client::builder().timeout(std::time::Duration::from_secs(30)).build()?;
    let gateway = Arc::new(ExchangeGateway::new(http));

    // C9's coarse worker-pool knob (spec §5); a small fixed pool is enough
    // since per-pair compute is CPU-only and I/O only happens in C1/C3/C4.
    let runtime = Runtime::new(num_cpus_or_default());

    let engine_settings = EngineSettings {
        chunk_size: settings.chunk_size,
        chunk_pause: settings.chunk_pause,
        arbitrability_threshold: settings.arbitrability_threshold,
    };
    let engine = Engine::new(gateway, catalog, cache, runtime, engine_settings);

    let state = AppState::new(engine, settings.timezone.clone());
    let router = arbspread_api::router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", settings.port))
        .await
        .with_context(|| format!("failed to bind port {}", settings.port))?;
    tracing::info!(port = settings.port, "listening");

    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("arbspread-node shut down cleanly");
    Ok(())
}

fn num_cpus_or_default() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
