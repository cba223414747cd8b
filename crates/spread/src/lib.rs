//! Spread Engine (C8): computes per-bucket max-min price spread across
//! exchanges, the exchanges realizing each extreme, and the global maximum
//! for one pair (spec §4.8).

use arbspread_sync::AlignedSeries;
use arbspread_types::{PairId, SpreadMax};
use chrono::{TimeZone, Utc};

/// One aligned bucket's max-min spread, with the winning series positions
/// rather than resolved ids — callers index `aligned.pe_ids` themselves so
/// this type carries no dependency on what a "pe id" means upstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadBucket {
    pub time_ms: i64,
    pub spread_percent: f64,
    pub high_idx: usize,
    pub low_idx: usize,
}

/// Computes the max-min spread for every aligned bucket (spec §4.8). This
/// is the shared core both `compute_max_spread` (the batch pipeline's
/// global-maximum reduction) and the on-demand "compare" query (which
/// wants the full per-bucket series, not just the winner) build on.
pub fn per_bucket_spreads(aligned: &AlignedSeries) -> Vec<SpreadBucket> {
    let bucket_count = aligned.series.first().map(Vec::len).unwrap_or(0);
    if aligned.pe_ids.is_empty() || bucket_count == 0 {
        return Vec::new();
    }

    let mut buckets = Vec::with_capacity(bucket_count);
    for t in 0..bucket_count {
        let mut max_close = f64::NEG_INFINITY;
        let mut min_close = f64::INFINITY;
        let mut high_idx = 0;
        let mut low_idx = 0;
        let mut time_ms = 0i64;

        for (idx, series) in aligned.series.iter().enumerate() {
            let candle = &series[t];
            time_ms = candle.time_ms;
            // Strict `>`/`<` keeps the first exchange in the input order as
            // the winner on ties (spec §4.8).
            if candle.close > max_close {
                max_close = candle.close;
                high_idx = idx;
            }
            if candle.close < min_close {
                min_close = candle.close;
                low_idx = idx;
            }
        }

        let spread = max_close - min_close;
        let mid = (max_close + min_close) / 2.0;
        let spread_percent = if mid > 0.0 { spread / mid * 100.0 } else { 0.0 };

        buckets.push(SpreadBucket { time_ms, spread_percent, high_idx, low_idx });
    }
    buckets
}

/// Computes the pair's global maximum spread over its aligned candle
/// series. Returns `None` (the bottom value) when there are no common
/// timestamps to compute over — the caller must not persist anything in
/// that case (spec §4.8). Ties across buckets favor the earliest bucket,
/// same strict-greater-than rule as the per-exchange tie-break.
pub fn compute_max_spread(pair_id: PairId, aligned: &AlignedSeries) -> Option<SpreadMax> {
    let mut best: Option<SpreadBucket> = None;
    for bucket in per_bucket_spreads(aligned) {
        if best.as_ref().map_or(true, |b| bucket.spread_percent > b.spread_percent) {
            best = Some(bucket);
        }
    }

    best.map(|bucket| SpreadMax {
        pair_id,
        time: Utc.timestamp_millis_opt(bucket.time_ms).single().unwrap_or_else(Utc::now),
        spread_percent: bucket.spread_percent,
        high_pe_id: aligned.pe_ids[bucket.high_idx],
        low_pe_id: aligned.pe_ids[bucket.low_idx],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbspread_types::{Candle, PeId};
    use test_case::test_case;

    fn candle(time_ms: i64, close: f64) -> Candle {
        Candle { time_ms, open: close, high: close, low: close, close, volume: 1.0 }
    }

    /// Spec §8 scenario 1: exchange A close 100, exchange B close 102 at the
    /// same bucket yields `spread_percent ≈ 1.980`. Table covers that and a
    /// few boundary cases (equal closes, a negative-direction pair,
    /// widening spread) through the same one-bucket harness.
    #[test_case(100.0, 102.0, 1.9801980198019802; "spec section 8 scenario 1")]
    #[test_case(100.0, 100.0, 0.0; "equal closes yield zero spread")]
    #[test_case(110.0, 100.0, 9.523809523809524; "order of inputs does not change magnitude")]
    #[test_case(50.0, 150.0, 100.0; "wide spread")]
    fn spread_percent_matches_expected(a: f64, b: f64, expected_pct: f64) {
        let aligned = AlignedSeries {
            pe_ids: vec![PeId(1), PeId(2)],
            series: vec![vec![candle(1000, a)], vec![candle(1000, b)]],
        };
        let bucket = per_bucket_spreads(&aligned).remove(0);
        assert!((bucket.spread_percent - expected_pct).abs() < 1e-9);
    }

    #[test]
    fn picks_the_bucket_with_the_largest_spread_percent() {
        let aligned = AlignedSeries {
            pe_ids: vec![PeId(1), PeId(2)],
            series: vec![
                vec![candle(1000, 100.0), candle(2000, 100.0)],
                vec![candle(1000, 101.0), candle(2000, 150.0)],
            ],
        };
        let result = compute_max_spread(PairId(1), &aligned).unwrap();
        assert_eq!(result.time.timestamp_millis(), 2000);
        assert_eq!(result.high_pe_id, PeId(2));
        assert_eq!(result.low_pe_id, PeId(1));
        assert!((result.spread_percent - 40.0).abs() < 1e-9);
    }

    #[test]
    fn ties_favor_the_first_exchange_in_input_order() {
        let aligned = AlignedSeries {
            pe_ids: vec![PeId(1), PeId(2)],
            series: vec![vec![candle(1000, 100.0)], vec![candle(1000, 100.0)]],
        };
        let result = compute_max_spread(PairId(1), &aligned).unwrap();
        assert_eq!(result.high_pe_id, PeId(1));
        assert_eq!(result.low_pe_id, PeId(1));
        assert_eq!(result.spread_percent, 0.0);
    }

    #[test]
    fn empty_aligned_input_yields_no_spread() {
        let aligned = AlignedSeries { pe_ids: vec![], series: vec![] };
        assert!(compute_max_spread(PairId(1), &aligned).is_none());
    }

    #[test]
    fn per_bucket_spreads_returns_one_entry_per_aligned_timestamp() {
        let aligned = AlignedSeries {
            pe_ids: vec![PeId(1), PeId(2)],
            series: vec![
                vec![candle(1000, 100.0), candle(2000, 100.0)],
                vec![candle(1000, 101.0), candle(2000, 150.0)],
            ],
        };
        let buckets = per_bucket_spreads(&aligned);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].time_ms, 1000);
        assert_eq!(buckets[1].time_ms, 2000);
    }
}
