use crate::client::ExchangeClient;
use crate::error::GatewayError;
use crate::http::{as_array, get_json, number};
use arbspread_config::Interval;
use arbspread_types::RawCandleRow;
use async_trait::async_trait;

pub struct MexcClient {
    http: reqwest::Client,
    base_url: String,
}

impl MexcClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: "https://api.mexc.com".to_string(),
        }
    }

    fn interval_param(interval: Interval) -> &'static str {
        match interval {
            Interval::FiveMinutes => "5m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "60m",
            Interval::FourHours => "4h",
            Interval::OneDay => "1d",
            Interval::OneWeek => "1W",
            Interval::OneMonth => "1M",
        }
    }
}

#[async_trait]
impl ExchangeClient for MexcClient {
    async fn list_markets(&self) -> Result<Vec<String>, GatewayError> {
        let url = format!("{}/api/v3/exchangeInfo", self.base_url);
        let body = get_json(&self.http, &url).await?;
        let symbols = as_array(&body["symbols"], "symbols")?;
        Ok(symbols
            .iter()
            .filter(|s| s["status"] == "ENABLED" || s["isSpotTradingAllowed"] == true)
            .filter_map(|s| s["symbol"].as_str().map(str::to_string))
            .collect())
    }

    async fn fetch_ohlcv(&self, symbol: &str, interval: Interval) -> Result<Vec<RawCandleRow>, GatewayError> {
        let url = format!(
            "{}/api/v3/klines?symbol={symbol}&interval={}&limit=500",
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
