//! Batch Fetcher (C5) and Scan & Dispatch (C6) — spec §4.5, §4.6.

use crate::Engine;
use arbspread_catalog::PairExchangeRow;
use arbspread_config::Interval;
use arbspread_spread::compute_max_spread;
use arbspread_sync::align_series;
use arbspread_types::{PairId, PeId, RawCandleRow};
use futures::future::{join_all, BoxFuture};
use tracing::info;

/// Summary of one `compute_all` run, returned for logging/observability —
/// not part of the persisted state (that lives entirely in C3).
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOutcome {
    pub total_pe: usize,
    pub chunks: usize,
    pub cached: usize,
}

impl Engine {
    /// The full batch run (spec §4.5):
    ///
    /// 1. load the arbitrable PE universe (C3, honoring the configured
    ///    threshold),
    /// 2. `init_batch` — the point at which the previous run's progress is
    ///    cleared,
    /// 3. slice into fixed-size chunks and, per chunk, fetch concurrently
    ///    (C1), cache-write successes (C4), `mark_cached` (C3), then chain a
    ///    scan → dispatch through the task runtime (C9, C6).
    pub async fn compute_all(&self, interval: Interval) -> anyhow::Result<BatchOutcome> {
        let rows = self.catalog.select_arbitrable(self.settings.arbitrability_threshold).await?;
        self.catalog.init_batch(&rows, interval).await?;

        let mut outcome = BatchOutcome { total_pe: rows.len(), ..Default::default() };
        let chunk_size = self.settings.chunk_size.max(1);

        for (chunk_no, chunk) in rows.chunks(chunk_size).enumerate() {
            let cached_ids = self.process_chunk(chunk, interval).await;
            outcome.chunks += 1;
            outcome.cached += cached_ids.len();

            self.catalog.mark_cached(&cached_ids).await?;
            info!(chunk = chunk_no, cached = cached_ids.len(), of = chunk.len(), "chunk processed");

            self.scan_and_dispatch(cached_ids).await?;

            // Pace successive chunks against external rate limits (spec §4.5
            // step 3). Sleeping once after the final chunk too is harmless.
            tokio::time::sleep(self.settings.chunk_pause).await;
        }

        Ok(outcome)
    }

    /// Fetches every PE in `chunk` concurrently (spec §5: "a single
    /// cooperative scheduler" per chunk) and writes non-empty results
    /// through to the cache. Empty/absent payloads are skipped silently —
    /// they remain stuck until a future run retries them (spec §4.5 step
    /// 4).
    async fn process_chunk(&self, chunk: &[PairExchangeRow], interval: Interval) -> Vec<PeId> {
        let fetches = chunk.iter().map(|row| async move {
            let payload = self.gateway.fetch_ohlcv(&row.pair_name, row.exchange, interval).await;
            (row.pe_id, payload)
        });

        let mut cached_ids = Vec::new();
        for (pe_id, payload) in join_all(fetches).await {
            match payload {
                Some(candles) if !candles.is_empty() => {
                    self.cache.set(pe_id, &candles, interval.cache_ttl()).await;
                    cached_ids.push(pe_id);
                }
                _ => {}
            }
        }
        cached_ids
    }

    /// `chain(scan, dispatch)` over the task runtime (spec §4.5 step 6,
    /// §4.9): the scan only runs once this chunk's `mark_cached` has
    /// committed (enforced by the caller awaiting it first), and dispatch
    /// only fans out over pairs the scan found ready.
    async fn scan_and_dispatch(&self, cached_ids: Vec<PeId>) -> anyhow::Result<()> {
        self.runtime
            .chain(
                || async { self.catalog.scan_ready(&cached_ids).await.map_err(anyhow::Error::from) },
                |ready_pairs| self.dispatch(ready_pairs),
            )
            .await
    }

    /// `dispatch(pair_ids)` (spec §4.6): spawns one compute task per newly
    /// ready pair, fanned out over the task runtime's worker pool. Two
    /// chunks can independently discover the same pair ready (split across
    /// chunks); duplicate dispatch is tolerated because `compute_pair` is
    /// idempotent at the data-visible level (spec §4.6 Race handling).
    async fn dispatch(&self, pair_ids: Vec<PairId>) -> anyhow::Result<()> {
        let jobs: Vec<BoxFuture<'static, anyhow::Result<()>>> = pair_ids
            .into_iter()
            .map(|pair_id| {
                let engine = self.clone();
                Box::pin(async move { engine.compute_pair(pair_id).await }) as BoxFuture<'static, anyhow::Result<()>>
            })
            .collect();
        self.runtime.group(jobs).await;
        Ok(())
    }

    /// Per-pair compute (C6 → C7 → C8 → C3): loads this pair's cached
    /// series, aligns them, computes the global maximum spread, and
    /// persists it with the pair-wide `computed` flip. If the cache read
    /// comes back empty for every PE (spec §8 scenario 6: "cache absent
    /// during compute"), alignment yields an empty set, the spread engine
    /// returns the bottom value, and nothing is persisted — `computed`
    /// stays false and the pair is retried by a future run.
    pub(crate) async fn compute_pair(&self, pair_id: PairId) -> anyhow::Result<()> {
        let pe_ids = self.catalog.pe_ids_for_pair(pair_id).await?;

        let mut series_by_pe: Vec<(PeId, Vec<RawCandleRow>)> = Vec::with_capacity(pe_ids.len());
        for pe_id in pe_ids {
            if let Some(candles) = self.cache.get(pe_id).await {
                series_by_pe.push((pe_id, candles));
            }
        }

        let refs: Vec<(PeId, &[RawCandleRow])> =
            series_by_pe.iter().map(|(pe_id, candles)| (*pe_id, candles.as_slice())).collect();
        let aligned = align_series(refs);

        if let Some(spread) = compute_max_spread(pair_id, &aligned) {
            self.catalog.save_spread_and_mark(&spread).await?;
        }
        Ok(())
    }
}
