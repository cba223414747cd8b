mod bingx;
mod binance;
mod bybit;
mod gateio;
mod kucoin;
mod mexc;
mod okx;

use crate::client::ExchangeClient;
use arbspread_config::Exchange;

/// Builds the default client for each exchange, sharing a single
/// `reqwest::Client` (and therefore its connection pool) across all of them.
pub fn default_client(exchange: Exchange, http: reqwest::Client) -> Box<dyn ExchangeClient> {
    match exchange {
        Exchange::Binance => Box::new(binance::BinanceClient::new(http)),
        Exchange::Okx => Box::new(okx::OkxClient::new(http)),
        Exchange::Bybit => Box::new(bybit::BybitClient::new(http)),
        Exchange::Mexc => Box::new(mexc::MexcClient::new(http)),
        Exchange::Bingx => Box::new(bingx::BingxClient::new(http)),
        Exchange::Gateio => Box::new(gateio::GateioClient::new(http)),
        Exchange::Kucoin => Box::new(kucoin::KucoinClient::new(http)),
    }
}
