//! Timeframe Synchronizer (C7): aligns per-exchange candle series for one
//! pair onto the intersection of their timestamps (spec §4.7).

use arbspread_types::{Candle, PeId, RawCandleRow};
use std::collections::HashSet;
use tracing::warn;

/// Candle series aligned to a common timestamp index, still carrying the
/// PE id each series came from — this is exactly the shape the spread
/// engine (C8) consumes.
pub struct AlignedSeries {
    pub pe_ids: Vec<PeId>,
    pub series: Vec<Vec<Candle>>,
}

/// Validates, then intersects, a list of one raw candle series per PE for a
/// single pair.
///
/// A series with any corrupted row (wrong arity, non-numeric) is logged and
/// dropped entirely; the remaining series still get aligned (spec §4.7).
/// Empty input, or an empty intersection, yields an empty `AlignedSeries`.
pub fn align_series<'a, I>(per_pe: I) -> AlignedSeries
where
    I: IntoIterator<Item = (PeId, &'a [RawCandleRow])>,
{
    let mut valid: Vec<(PeId, Vec<Candle>)> = Vec::new();

    for (pe_id, rows) in per_pe {
        let mut candles = Vec::with_capacity(rows.len());
        let mut corrupted = false;
        for row in rows {
            match Candle::from_row(row) {
                Ok(candle) => candles.push(candle),
                Err(err) => {
                    warn!(%pe_id, error = %err, "corrupted candle row, excluding series from alignment");
                    corrupted = true;
                    break;
                }
            }
        }
        if !corrupted {
            valid.push((pe_id, candles));
        }
    }

    if valid.is_empty() {
        return AlignedSeries { pe_ids: Vec::new(), series: Vec::new() };
    }

    let mut common: HashSet<i64> = valid[0].1.iter().map(|c| c.time_ms).collect();
    for (_, candles) in &valid[1..] {
        let timestamps: HashSet<i64> = candles.iter().map(|c| c.time_ms).collect();
        common.retain(|t| timestamps.contains(t));
    }

    let pe_ids = valid.iter().map(|(id, _)| *id).collect();
    let series = valid
        .into_iter()
        .map(|(_, candles)| candles.into_iter().filter(|c| common.contains(&c.time_ms)).collect())
        .collect();

    AlignedSeries { pe_ids, series }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn row(t: i64, close: f64) -> RawCandleRow {
        vec![t as f64, close, close, close, close, 1.0]
    }

    /// Spec §4.7's arity/numeric corruption rules, tabulated: any row that
    /// fails `Candle::from_row` drops its whole series from the alignment.
    #[test_case(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], true; "well formed row survives")]
    #[test_case(vec![1.0, 2.0, 3.0], false; "wrong arity is corrupt")]
    #[test_case(vec![1.0, 2.0, 3.0, 4.0, 5.0, f64::NAN], false; "non-numeric field is corrupt")]
    fn series_with_a_single_row_is_dropped_iff_that_row_is_corrupt(candle_row: RawCandleRow, should_survive: bool) {
        let other = vec![row(1000, 1.0)];
        let aligned = align_series(vec![(PeId(1), [candle_row].as_slice()), (PeId(2), other.as_slice())]);
        assert_eq!(aligned.pe_ids.contains(&PeId(1)), should_survive);
        assert!(aligned.pe_ids.contains(&PeId(2)), "the uncorrupted peer always survives");
    }

    #[test]
    fn intersects_timestamps_across_series() {
        let a = vec![row(1000, 1.0), row(2000, 2.0), row(3000, 3.0)];
        let b = vec![row(2000, 20.0), row(3000, 30.0), row(4000, 40.0)];
        let aligned = align_series(vec![(PeId(1), a.as_slice()), (PeId(2), b.as_slice())]);
        assert_eq!(aligned.pe_ids, vec![PeId(1), PeId(2)]);
        assert_eq!(aligned.series[0].iter().map(|c| c.time_ms).collect::<Vec<_>>(), vec![2000, 3000]);
        assert_eq!(aligned.series[1].iter().map(|c| c.time_ms).collect::<Vec<_>>(), vec![2000, 3000]);
    }

    #[test]
    fn excludes_corrupted_series_but_keeps_others() {
        let a = vec![row(1000, 1.0), row(2000, 2.0)];
        let corrupt = vec![vec![1000.0, 1.0, 1.0]];
        let aligned = align_series(vec![(PeId(1), a.as_slice()), (PeId(2), corrupt.as_slice())]);
        assert_eq!(aligned.pe_ids, vec![PeId(1)]);
        assert_eq!(aligned.series.len(), 1);
    }

    #[test]
    fn empty_intersection_yields_empty_aligned_set() {
        let a = vec![row(1000, 1.0)];
        let b = vec![row(2000, 2.0)];
        let aligned = align_series(vec![(PeId(1), a.as_slice()), (PeId(2), b.as_slice())]);
        assert_eq!(aligned.pe_ids, vec![PeId(1), PeId(2)]);
        assert!(aligned.series[0].is_empty());
        assert!(aligned.series[1].is_empty());
    }

    #[test]
    fn no_input_series_yields_empty_aligned_set() {
        let aligned = align_series(Vec::<(PeId, &[RawCandleRow])>::new());
        assert!(aligned.pe_ids.is_empty());
        assert!(aligned.series.is_empty());
    }
}
