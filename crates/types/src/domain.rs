use crate::ids::{PairId, PeId};
use arbspread_config::{Exchange, Interval};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique textual identity of a tradable symbol, e.g. `BTC/USDT` (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub id: PairId,
    pub name: String,
}

/// One `(pair, exchange)` tuple (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairExchange {
    pub id: PeId,
    pub pair_id: PairId,
    pub exchange: Exchange,
}

/// Progress row for one PE during a batch run (spec §3, §4.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchTask {
    pub pe_id: PeId,
    pub pair_id: PairId,
    pub interval: Interval,
    pub cached: bool,
    pub computed: bool,
    /// Synonymous with `computed` today; reserved for a future durability
    /// stage split (spec §9 Open Questions).
    pub persisted: bool,
}

/// The per-pair global maximum spread, upserted by the compute stage
/// (spec §3, §4.3, §4.8).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadMax {
    pub pair_id: PairId,
    pub time: DateTime<Utc>,
    pub spread_percent: f64,
    pub high_pe_id: PeId,
    pub low_pe_id: PeId,
}

/// A pair together with the exchanges that support it — the shape produced
/// by the universe builder (C2) and consumed by the batch fetcher (C5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrablePair {
    pub name: String,
    pub exchanges: Vec<Exchange>,
}
