//! On-demand "compare exchanges" query (SPEC_FULL §B, grounded on
//! `original_source/backend/src/routes/scan_spreads.py`'s
//! `POST /per-ticker/all` and `/per-ticker/max`): fetches, aligns, and
//! spreads one pair across a subset of its catalog-registered exchanges
//! without touching batch progress state (`batch_task`/`spread_max`).

use crate::Engine;
use arbspread_config::{Exchange, Interval};
use arbspread_sync::align_series;
use arbspread_spread::per_bucket_spreads;
use arbspread_types::{PeId, RawCandleRow};
use chrono::{DateTime, TimeZone, Utc};
use futures::future::join_all;
use std::collections::HashMap;

/// One aligned bucket of the on-demand comparison, resolved back to
/// human-facing exchange names rather than internal PE ids (spec §6: API
/// responses name exchanges, not surrogate ids).
#[derive(Debug, Clone, PartialEq)]
pub struct BucketSpread {
    pub time: DateTime<Utc>,
    pub spread_percent: f64,
    pub high_exchange: Exchange,
    pub low_exchange: Exchange,
}

impl Engine {
    /// Computes the full per-bucket spread series for one pair across the
    /// given exchange subset (all of the pair's catalog-registered
    /// exchanges if `exchanges` is `None`). Returns `None` if the pair is
    /// not in the catalog at all, `Some(empty)` if it is but the requested
    /// exchanges share no common timestamp (spec §4.7 "empty intersection
    /// yields an empty aligned set").
    pub async fn compare_all(
        &self,
        pair_name: &str,
        exchanges: Option<&[Exchange]>,
        interval: Interval,
    ) -> anyhow::Result<Option<Vec<BucketSpread>>> {
        let mut pes = self.catalog.pair_exchanges_by_name(pair_name).await?;
        if let Some(subset) = exchanges {
            pes.retain(|pe| subset.contains(&pe.exchange));
        }
        if pes.is_empty() {
            return Ok(None);
        }

        let exchange_of: HashMap<PeId, Exchange> = pes.iter().map(|pe| (pe.pe_id, pe.exchange)).collect();

        let fetches = pes.iter().map(|pe| async move {
            let candles = self.cache_aside(pe.pe_id, pair_name, pe.exchange, interval).await;
            (pe.pe_id, candles)
        });
        let fetched: Vec<(PeId, Option<Vec<RawCandleRow>>)> = join_all(fetches).await;

        let series_by_pe: Vec<(PeId, Vec<RawCandleRow>)> =
            fetched.into_iter().filter_map(|(pe_id, candles)| candles.map(|c| (pe_id, c))).collect();
        let refs: Vec<(PeId, &[RawCandleRow])> =
            series_by_pe.iter().map(|(pe_id, candles)| (*pe_id, candles.as_slice())).collect();
        let aligned = align_series(refs);

        let rows = per_bucket_spreads(&aligned)
            .into_iter()
            .map(|bucket| BucketSpread {
                time: Utc.timestamp_millis_opt(bucket.time_ms).single().unwrap_or_else(Utc::now),
                spread_percent: bucket.spread_percent,
                high_exchange: exchange_of[&aligned.pe_ids[bucket.high_idx]],
                low_exchange: exchange_of[&aligned.pe_ids[bucket.low_idx]],
            })
            .collect();

        Ok(Some(rows))
    }

    /// Just the maximum-spread bucket of [`Engine::compare_all`] (spec §6
    /// `POST /spreads/computed`-equivalent for on-demand queries; routed as
    /// `/per-ticker/max` in the original).
    pub async fn compare_max(
        &self,
        pair_name: &str,
        exchanges: Option<&[Exchange]>,
        interval: Interval,
    ) -> anyhow::Result<Option<BucketSpread>> {
        let Some(rows) = self.compare_all(pair_name, exchanges, interval).await? else {
            return Ok(None);
        };
        let mut best: Option<BucketSpread> = None;
        for row in rows {
            if best.as_ref().map_or(true, |b| row.spread_percent > b.spread_percent) {
                best = Some(row);
            }
        }
        Ok(best)
    }

    /// Cache-aside single-ticker fetch (SPEC_FULL §B): a cache hit skips the
    /// exchange round-trip entirely; a miss fetches once (C1) and writes
    /// through (C4) before returning, so a subsequent call — or a later
    /// batch run touching the same PE — reuses it.
    pub(crate) async fn cache_aside(
        &self,
        pe_id: PeId,
        pair_name: &str,
        exchange: Exchange,
        interval: Interval,
    ) -> Option<Vec<RawCandleRow>> {
        if let Some(candles) = self.cache.get(pe_id).await {
            return Some(candles);
        }
        let candles = self.gateway.fetch_ohlcv(pair_name, exchange, interval).await?;
        if !candles.is_empty() {
            self.cache.set(pe_id, &candles, interval.cache_ttl()).await;
        }
        Some(candles)
    }
}
