//! Fixed enumerations served by `GET /static/config/{type}` (§6), ported
//! from `original_source/backend/src/config/config.py`'s `TIME_RANGES` /
//! `SUPPORTED_PAIRS` tables.

use crate::exchange::Exchange;
use crate::interval::Interval;
use serde_json::{json, Map, Value};

/// A human-facing display name for a seed pair this deployment advertises on
/// its frontend. This is a UI convenience list, unrelated to the universe
/// actually discovered by C2 at runtime.
pub const SUPPORTED_PAIRS: &[(&str, &str)] = &[
    ("BTC/USDT", "Bitcoin"),
    ("ETH/USDT", "Ethereum"),
    ("SOL/USDT", "Solana"),
    ("ADA/USDT", "Cardano"),
    ("AVAX/USDT", "Avalanche"),
    ("DOT/USDT", "Polkadot"),
    ("DOGE/USDT", "Dogecoin"),
    ("SHIB/USDT", "Shiba Inu"),
    ("LTC/USDT", "Litecoin"),
    ("BCH/USDT", "Bitcoin Cash"),
    ("ETC/USDT", "Ethereum Classic"),
    ("XRP/USDT", "Ripple"),
    ("TRX/USDT", "Tron"),
    ("LINK/USDT", "Chainlink"),
    ("UNI/USDT", "Uniswap"),
    ("AAVE/USDT", "Aave"),
];

/// Looks up one of the named static config types. Returns `None` for an
/// unrecognized `config_type`, which the API layer turns into a 400 (§7).
pub fn lookup(config_type: &str) -> Option<Value> {
    match config_type {
        "time-ranges" => Some(Value::Object(
            Interval::ALL
                .into_iter()
                .map(|interval| (interval.as_str().to_string(), json!(interval.display_label())))
                .collect::<Map<String, Value>>(),
        )),
        "pairs" => Some(Value::Object(
            SUPPORTED_PAIRS
                .iter()
                .map(|(pair, label)| (pair.to_string(), json!(label)))
                .collect::<Map<String, Value>>(),
        )),
        "exchanges" => Some(json!(Exchange::ALL.map(|e| e.to_string()))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_config_types_resolve() {
        assert!(lookup("time-ranges").is_some());
        assert!(lookup("pairs").is_some());
        assert!(lookup("exchanges").is_some());
    }

    #[test]
    fn unknown_config_type_is_none() {
        assert!(lookup("bogus").is_none());
    }
}
