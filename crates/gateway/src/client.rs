use crate::error::GatewayError;
use arbspread_config::Interval;
use arbspread_types::RawCandleRow;
use async_trait::async_trait;

/// Uniform capability set every exchange client must provide (Design Notes
/// §9: "dynamic dispatch over exchanges ... a closed tagged variant of
/// supported exchanges plus a uniform capability set
/// `{list_markets, fetch_ohlcv, close}`").
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// All symbols this exchange lists, in the exchange's native format.
    async fn list_markets(&self) -> Result<Vec<String>, GatewayError>;

    /// OHLCV candles for `symbol` (native format) at `interval`, oldest
    /// first. Timestamps are normalized to epoch milliseconds UTC here, at
    /// the gateway boundary (spec §4.1).
    async fn fetch_ohlcv(&self, symbol: &str, interval: Interval) -> Result<Vec<RawCandleRow>, GatewayError>;

    /// Releases any held connections. A no-op for stateless HTTP clients;
    /// present so the capability set matches the spec's closed model even
    /// though the current transport (plain `reqwest::Client`) has nothing to
    /// tear down explicitly.
    async fn close(&self) {}
}
