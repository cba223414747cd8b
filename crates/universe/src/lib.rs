//! Universe Builder (C2): turns per-exchange symbol lists into the set of
//! pairs supported by at least `threshold` exchanges, each tagged with its
//! supporting exchanges (spec §4.2).

use arbspread_config::Exchange;
use arbspread_gateway::ExchangeSymbols;
use arbspread_types::ArbitrablePair;
use std::collections::BTreeMap;

/// Builds the arbitrable-pair universe from a sparse presence matrix.
///
/// Algorithm (spec §4.2): build `pair -> [exchange]` by scanning every
/// exchange's symbol list, drop pairs whose support count is below
/// `threshold`, then return sorted by pair name for deterministic ordering
/// across runs.
pub fn build_universe(catalogs: &[ExchangeSymbols], threshold: usize) -> Vec<ArbitrablePair> {
    // BTreeMap keeps insertion-independent, deterministic iteration by pair
    // name without a separate sort step.
    let mut presence: BTreeMap<&str, Vec<Exchange>> = BTreeMap::new();
    for catalog in catalogs {
        for symbol in &catalog.symbols {
            presence.entry(symbol.as_str()).or_default().push(catalog.id);
        }
    }

    presence
        .into_iter()
        .filter(|(_, exchanges)| exchanges.len() >= threshold)
        .map(|(name, exchanges)| ArbitrablePair {
            name: name.to_string(),
            exchanges,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(id: Exchange, symbols: &[&str]) -> ExchangeSymbols {
        ExchangeSymbols {
            id,
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn drops_pairs_below_threshold() {
        let catalogs = vec![
            catalog(Exchange::Binance, &["BTC/USDT", "ETH/USDT"]),
            catalog(Exchange::Okx, &["BTC/USDT"]),
        ];
        let universe = build_universe(&catalogs, 2);
        assert_eq!(universe.len(), 1);
        assert_eq!(universe[0].name, "BTC/USDT");
        assert_eq!(universe[0].exchanges, vec![Exchange::Binance, Exchange::Okx]);
    }

    #[test]
    fn orders_deterministically_by_pair_name() {
        let catalogs = vec![
            catalog(Exchange::Binance, &["ZRX/USDT", "AAVE/USDT"]),
            catalog(Exchange::Okx, &["ZRX/USDT", "AAVE/USDT"]),
        ];
        let universe = build_universe(&catalogs, 2);
        let names: Vec<&str> = universe.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["AAVE/USDT", "ZRX/USDT"]);
    }

    #[test]
    fn empty_catalogs_yield_empty_universe() {
        assert!(build_universe(&[], 2).is_empty());
    }

    #[test]
    fn threshold_of_one_keeps_single_exchange_pairs() {
        let catalogs = vec![catalog(Exchange::Binance, &["BTC/USDT"])];
        let universe = build_universe(&catalogs, 1);
        assert_eq!(universe.len(), 1);
    }
}
