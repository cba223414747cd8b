pub mod candle;
pub mod domain;
pub mod ids;

pub use candle::{Candle, CorruptCandle, RawCandleRow};
pub use domain::{ArbitrablePair, BatchTask, Pair, PairExchange, SpreadMax};
pub use ids::{PairId, PeId};
