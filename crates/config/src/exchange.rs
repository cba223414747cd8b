use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The closed set of exchanges this pipeline knows how to talk to.
///
/// Spec §6 calls this set closed; adding a new venue means adding a new
/// variant here plus a gateway client for it, not threading a string through
/// the system (Design Notes §9: "dynamic dispatch over exchanges" is
/// expressed as a tagged variant).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    Binance,
    Okx,
    Bybit,
    Mexc,
    Bingx,
    Gateio,
    Kucoin,
}

impl Exchange {
    pub const ALL: [Exchange; 7] = [
        Exchange::Binance,
        Exchange::Okx,
        Exchange::Bybit,
        Exchange::Mexc,
        Exchange::Bingx,
        Exchange::Gateio,
        Exchange::Kucoin,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn round_trips_through_lowercase_string() {
        for exchange in Exchange::ALL {
            let s = exchange.to_string();
            assert_eq!(Exchange::from_str(&s).unwrap(), exchange);
        }
    }

    #[test]
    fn rejects_unknown_exchange() {
        assert!(Exchange::from_str("coinbase").is_err());
    }
}
