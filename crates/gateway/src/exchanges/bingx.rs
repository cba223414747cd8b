use crate::client::ExchangeClient;
use crate::error::GatewayError;
use crate::http::{as_array, get_json, number};
use arbspread_config::Interval;
use arbspread_types::RawCandleRow;
use async_trait::async_trait;

pub struct BingxClient {
    http: reqwest::Client,
    base_url: String,
}

impl BingxClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: "https://open-api.bingx.com".to_string(),
        }
    }

    fn interval_param(interval: Interval) -> &'static str {
        match interval {
            Interval::FiveMinutes => "5m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::FourHours => "4h",
            Interval::OneDay => "1d",
            Interval::OneWeek => "1w",
            Interval::OneMonth => "1M",
        }
    }
}

#[async_trait]
impl ExchangeClient for BingxClient {
    async fn list_markets(&self) -> Result<Vec<String>, GatewayError> {
        let url = format!("{}/openApi/spot/v1/common/symbols", self.base_url);
        let body = get_json(&self.http, &url).await?;
        let symbols = as_array(&body["data"]["symbols"], "data.symbols")?;
        Ok(symbols.iter().filter_map(|s| s["symbol"].as_str().map(str::to_string)).collect())
    }

    async fn fetch_ohlcv(&self, symbol: &str, interval: Interval) -> Result<Vec<RawCandleRow>, GatewayError> {
        let url = format!(
            "{}/openApi/spot/v2/market/kline?symbol={symbol}&interval={}&limit=500",
            self.base_url,
            Self::interval_param(interval)
        );
        let body = get_json(&self.http, &url).await?;
        let rows = as_array(&body["data"], "data")?;
        // BingX returns candles as objects, not positional arrays.
        rows.iter()
            .map(|row| {
                Ok(vec![
                    number(&row["time"])?,
                    number(&row["open"])?,
                    number(&row["high"])?,
                    number(&row["low"])?,
                    number(&row["close"])?,
                    number(&row["volume"])?,
                ])
            })
            .collect()
    }
}
