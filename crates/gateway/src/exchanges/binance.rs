use crate::client::ExchangeClient;
use crate::error::GatewayError;
use crate::http::{as_array, get_json, number};
use arbspread_config::Interval;
use arbspread_types::RawCandleRow;
use async_trait::async_trait;

pub struct BinanceClient {
    http: reqwest::Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: "https://api.binance.com".to_string(),
        }
    }

    fn interval_param(interval: Interval) -> &'static str {
        // Binance's kline intervals happen to match our canonical strings 1:1.
        interval.as_str()
    }

    #[cfg(test)]
    fn with_base_url(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl ExchangeClient for BinanceClient {
    async fn list_markets(&self) -> Result<Vec<String>, GatewayError> {
        let url = format!("{}/api/v3/exchangeInfo", self.base_url);
        let body = get_json(&self.http, &url).await?;
        let symbols = as_array(&body["symbols"], "symbols")?;
        Ok(symbols
            .iter()
            .filter(|s| s["status"] == "TRADING")
            .filter_map(|s| s["symbol"].as_str().map(str::to_string))
            .collect())
    }

    async fn fetch_ohlcv(&self, symbol: &str, interval: Interval) -> Result<Vec<RawCandleRow>, GatewayError> {
        let url = format!(
            "{}/api/v3/klines?symbol={symbol}&interval={}&limit=1000",
            self.base_url,
            Self::interval_param(interval)
        );
        let body = get_json(&self.http, &url).await?;
        let rows = as_array(&body, "klines")?;
        rows.iter()
            .map(|row| {
                let row = as_array(row, "kline row")?;
                let mut candle = Vec::with_capacity(6);
                for field in row.iter().take(6) {
                    candle.push(number(field)?);
                }
                Ok(candle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{matchers::request, responders::json_encoded, Expectation, Server};

    #[tokio::test]
    async fn fetch_ohlcv_normalizes_string_and_number_fields() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/api/v3/klines"))
                .respond_with(json_encoded(serde_json::json!([
                    [1700000000000i64, "50000.5", "50100.0", 49900.0, "50050.25", "12.5", 1700000059999i64, "0", 0, "0", "0", "0"],
                ]))),
        );
        let client = BinanceClient::with_base_url(reqwest::Client::new(), server.url_str(""));
        let candles = client.fetch_ohlcv("BTCUSDT", Interval::OneHour).await.unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0], vec![1700000000000.0, 50000.5, 50100.0, 49900.0, 50050.25, 12.5]);
    }

    #[tokio::test]
    async fn fetch_ohlcv_rejects_non_numeric_field() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/api/v3/klines"))
                .respond_with(json_encoded(serde_json::json!([
                    [1700000000000i64, "not-a-number", 1.0, 1.0, 1.0, 1.0],
                ]))),
        );
        let client = BinanceClient::with_base_url(reqwest::Client::new(), server.url_str(""));
        let result = client.fetch_ohlcv("BTCUSDT", Interval::OneHour).await;
        assert!(matches!(result, Err(GatewayError::Decode(_))));
    }
}
