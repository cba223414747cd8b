//! Symbol format normalization between the canonical `BASE/QUOTE` pair name
//! used throughout the pipeline and each exchange's native listing format
//! (spec §4.1: "Symbol format normalization (e.g. `BTC-USDT` vs `BTC/USDT`)
//! is done here").

use arbspread_config::Exchange;

/// Converts an exchange-native symbol into the canonical `BASE/QUOTE` form.
pub fn to_canonical(native: &str, exchange: Exchange) -> String {
    match exchange {
        Exchange::Binance | Exchange::Mexc => insert_separator_at_known_quotes(native, '/'),
        Exchange::Okx | Exchange::Bybit | Exchange::Bingx | Exchange::Gateio | Exchange::Kucoin => {
            native.replace('-', "/").replace('_', "/")
        }
    }
    .to_uppercase()
}

/// Converts a canonical `BASE/QUOTE` pair name into the format the given
/// exchange expects in its own request path/params.
pub fn to_native(canonical: &str, exchange: Exchange) -> String {
    let upper = canonical.to_uppercase();
    match exchange {
        Exchange::Binance | Exchange::Mexc => upper.replace('/', ""),
        Exchange::Okx | Exchange::Bybit | Exchange::Bingx | Exchange::Gateio => upper.replace('/', "-"),
        Exchange::Kucoin => upper.replace('/', "-"),
    }
}

/// Binance/MEXC list symbols with no separator (`BTCUSDT`). We cannot always
/// invert this losslessly without a quote-asset dictionary, so we match
/// against a short list of quote assets that covers everything this
/// pipeline's universe actually trades against.
const KNOWN_QUOTES: &[&str] = &["USDT", "USDC", "BUSD", "BTC", "ETH"];

fn insert_separator_at_known_quotes(native: &str, sep: char) -> String {
    let upper = native.to_uppercase();
    for quote in KNOWN_QUOTES {
        if let Some(base) = upper.strip_suffix(quote) {
            if !base.is_empty() {
                return format!("{base}{sep}{quote}");
            }
        }
    }
    upper
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binance_round_trips_common_pairs() {
        assert_eq!(to_canonical("BTCUSDT", Exchange::Binance), "BTC/USDT");
        assert_eq!(to_native("BTC/USDT", Exchange::Binance), "BTCUSDT");
    }

    #[test]
    fn okx_uses_hyphen_natively() {
        assert_eq!(to_canonical("BTC-USDT", Exchange::Okx), "BTC/USDT");
        assert_eq!(to_native("BTC/USDT", Exchange::Okx), "BTC-USDT");
    }
}
