use crate::client::ExchangeClient;
use crate::error::GatewayError;
use crate::http::{as_array, get_json, number};
use arbspread_config::Interval;
use arbspread_types::RawCandleRow;
use async_trait::async_trait;

pub struct OkxClient {
    http: reqwest::Client,
    base_url: String,
}

impl OkxClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: "https://www.okx.com".to_string(),
        }
    }

    fn bar_param(interval: Interval) -> &'static str {
        match interval {
            Interval::FiveMinutes => "5m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1H",
            Interval::FourHours => "4H",
            Interval::OneDay => "1D",
            Interval::OneWeek => "1W",
            Interval::OneMonth => "1M",
        }
    }
}

#[async_trait]
impl ExchangeClient for OkxClient {
    async fn list_markets(&self) -> Result<Vec<String>, GatewayError> {
        let url = format!("{}/api/v5/public/instruments?instType=SPOT", self.base_url);
        let body = get_json(&self.http, &url).await?;
        let data = as_array(&body["data"], "data")?;
        Ok(data.iter().filter_map(|d| d["instId"].as_str().map(str::to_string)).collect())
    }

    async fn fetch_ohlcv(&self, symbol: &str, interval: Interval) -> Result<Vec<RawCandleRow>, GatewayError> {
        let url = format!(
            "{}/api/v5/market/candles?instId={symbol}&bar={}&limit=300",
            self.base_url,
            Self::bar_param(interval)
        );
        let body = get_json(&self.http, &url).await?;
        let rows = as_array(&body["data"], "data")?;
        let mut candles = rows
            .iter()
            .map(|row| {
                let row = as_array(row, "candle row")?;
                let mut candle = Vec::with_capacity(6);
                for field in row.iter().take(6) {
                    candle.push(number(field)?);
                }
                Ok(candle)
            })
            .collect::<Result<Vec<RawCandleRow>, GatewayError>>()?;
        // OKX returns newest-first; the gateway contract promises strictly
        // increasing timestamps (spec §3).
        candles.reverse();
        Ok(candles)
    }
}
