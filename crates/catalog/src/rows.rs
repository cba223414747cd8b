use arbspread_config::Exchange;
use arbspread_types::{PairId, PeId};
use chrono::{DateTime, Utc};

/// One row of `select_arbitrable` (spec §4.3): a PE together with its
/// parent pair's name, which the batch fetcher needs to address the
/// exchange gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairExchangeRow {
    pub pe_id: PeId,
    pub pair_id: PairId,
    pub pair_name: String,
    pub exchange: Exchange,
}

/// Aggregate counts backing `GET /spreads/batch-status` (spec §6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchStatus {
    pub total_pairs: i64,
    pub cached: i64,
    pub spreads_computed: i64,
}

impl BatchStatus {
    pub fn processing_progress_pct(&self) -> f64 {
        if self.total_pairs == 0 {
            0.0
        } else {
            self.spreads_computed as f64 / self.total_pairs as f64 * 100.0
        }
    }
}

/// One row of `GET /spreads/computed` (spec §6): a `SpreadMax` joined back
/// out to human-readable pair and exchange names.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedSpreadRow {
    pub pair_name: String,
    pub time: DateTime<Utc>,
    pub high_exchange: Exchange,
    pub low_exchange: Exchange,
    pub spread_percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_zero_with_no_pairs_in_the_run() {
        let status = BatchStatus { total_pairs: 0, cached: 0, spreads_computed: 0 };
        assert_eq!(status.processing_progress_pct(), 0.0);
    }

    #[test]
    fn progress_is_the_computed_over_total_ratio() {
        let status = BatchStatus { total_pairs: 4, cached: 4, spreads_computed: 1 };
        assert_eq!(status.processing_progress_pct(), 25.0);
    }
}
