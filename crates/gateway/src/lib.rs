//! Exchange Gateway (C1): a unified read interface to every exchange this
//! pipeline knows about — list markets, fetch OHLCV. No retries happen at
//! this layer (spec §4.1); a chunk that comes back short is retried, as a
//! whole, on the next batch run (C5).

pub mod client;
pub mod error;
mod exchanges;
pub mod symbol;

use arbspread_config::{Exchange, Interval};
use arbspread_types::RawCandleRow;
use client::ExchangeClient;
use futures::future::join_all;
use std::collections::HashMap;
use tracing::warn;

pub use error::GatewayError;

/// One exchange's market catalog, in the gateway's canonical `BASE/QUOTE`
/// naming.
pub struct ExchangeSymbols {
    pub id: Exchange,
    pub symbols: Vec<String>,
}

pub struct ExchangeGateway {
    clients: HashMap<Exchange, Box<dyn ExchangeClient>>,
}

impl ExchangeGateway {
    pub fn new(http: reqwest::Client) -> Self {
        let clients = Exchange::ALL
            .into_iter()
            .map(|exchange| (exchange, exchanges::default_client(exchange, http.clone())))
            .collect();
        Self { clients }
    }

    /// Loads per-exchange market catalogs concurrently, normalizing every
    /// native symbol to the canonical `BASE/QUOTE` form.
    pub async fn list_exchanges_with_symbols(&self, exchanges: &[Exchange]) -> Vec<ExchangeSymbols> {
        let futures = exchanges.iter().map(|&exchange| async move {
            let client = self.clients.get(&exchange).expect("client exists for every Exchange variant");
            match client.list_markets().await {
                Ok(native_symbols) => {
                    let symbols = native_symbols
                        .into_iter()
                        .map(|native| symbol::to_canonical(&native, exchange))
                        .collect();
                    Some(ExchangeSymbols { id: exchange, symbols })
                }
                Err(err) => {
                    warn!(%exchange, error = %err, "failed to list markets, excluding exchange from this universe build");
                    None
                }
            }
        });
        join_all(futures).await.into_iter().flatten().collect()
    }

    /// Fetches one pair's OHLCV series from one exchange. Returns `None` on
    /// any gateway, network, or symbol error — the bottom value the rest of
    /// the pipeline treats as "this PE is not ready yet" (spec §4.1).
    pub async fn fetch_ohlcv(&self, pair_name: &str, exchange: Exchange, interval: Interval) -> Option<Vec<RawCandleRow>> {
        let client = self.clients.get(&exchange)?;
        let native_symbol = symbol::to_native(pair_name, exchange);
        match client.fetch_ohlcv(&native_symbol, interval).await {
            Ok(candles) => Some(candles),
            Err(err) => {
                warn!(%exchange, pair = pair_name, error = %err, "fetch_ohlcv failed, treating as absent");
                None
            }
        }
    }
}
