//! Batch Fetcher (C5) and Scan & Dispatch (C6), plus the on-demand compare
//! query (SPEC_FULL §B). This crate is the orchestration layer: it owns no
//! storage of its own and holds explicitly constructed handles to every
//! collaborator it needs (Design Notes §9 — "Global singletons... Model as
//! explicitly constructed collaborators passed by reference").

mod batch;
mod compare;
mod pairs;

pub use batch::BatchOutcome;
pub use compare::BucketSpread;

use arbspread_cache::Cache;
use arbspread_catalog::Catalog;
use arbspread_gateway::ExchangeGateway;
use arbspread_runtime::Runtime;
use std::sync::Arc;
use std::time::Duration;

/// Per-run tuning knobs from spec §4.5/§5: chunk size bounds peak
/// concurrency against external exchange APIs, `chunk_pause` paces
/// successive chunks, and `arbitrability_threshold` is the minimum
/// exchange-support count a pair needs to enter the universe (spec §3).
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub chunk_size: usize,
    pub chunk_pause: Duration,
    pub arbitrability_threshold: i64,
}

/// The wiring point for C1/C3/C4/C9: everything the batch fetcher, scan &
/// dispatch, and the on-demand compare query need. Cheap to clone — every
/// field is either already `Clone` (a pooled `Catalog`, a pool-backed
/// `Runtime`) or behind an `Arc` — so `group()` fan-out can hand each
/// spawned compute task its own owned `Engine`.
#[derive(Clone)]
pub struct Engine {
    gateway: Arc<ExchangeGateway>,
    catalog: Catalog,
    cache: Arc<Cache>,
    runtime: Runtime,
    settings: EngineSettings,
}

impl Engine {
    pub fn new(
        gateway: Arc<ExchangeGateway>,
        catalog: Catalog,
        cache: Arc<Cache>,
        runtime: Runtime,
        settings: EngineSettings,
    ) -> Self {
        Self { gateway, catalog, cache, runtime, settings }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }
}
