use crate::client::ExchangeClient;
use crate::error::GatewayError;
use crate::http::{as_array, get_json, number};
use arbspread_config::Interval;
use arbspread_types::RawCandleRow;
use async_trait::async_trait;

pub struct GateioClient {
    http: reqwest::Client,
    base_url: String,
}

impl GateioClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: "https://api.gateio.ws".to_string(),
        }
    }

    fn interval_param(interval: Interval) -> &'static str {
        match interval {
            Interval::FiveMinutes => "5m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::FourHours => "4h",
            Interval::OneDay => "1d",
            Interval::OneWeek => "7d",
            Interval::OneMonth => "30d",
        }
    }
}

#[async_trait]
impl ExchangeClient for GateioClient {
    async fn list_markets(&self) -> Result<Vec<String>, GatewayError> {
        let url = format!("{}/api/v4/spot/currency_pairs", self.base_url);
        let body = get_json(&self.http, &url).await?;
        let pairs = as_array(&body, "currency_pairs")?;
        Ok(pairs
            .iter()
            .filter(|p| p["trade_status"] == "tradable")
            .filter_map(|p| p["id"].as_str().map(str::to_string))
            .collect())
    }

    async fn fetch_ohlcv(&self, symbol: &str, interval: Interval) -> Result<Vec<RawCandleRow>, GatewayError> {
        let url = format!(
            "{}/api/v4/spot/candlesticks?currency_pair={symbol}&interval={}&limit=500",
            self.base_url,
            Self::interval_param(interval)
        );
        let body = get_json(&self.http, &url).await?;
        let rows = as_array(&body, "candlesticks")?;
        rows.iter()
            .map(|row| {
                let row = as_array(row, "candlestick row")?;
                if row.len() < 6 {
                    return Err(GatewayError::Decode(format!("expected 6 candlestick fields, got {}", row.len())));
                }
                // Gate.io orders fields [timestamp(s), volume, close, high, low, open];
                // reorder to our [time(ms), open, high, low, close, volume] and
                // convert the timestamp from seconds to milliseconds.
                let timestamp_s = number(&row[0])?;
                let volume = number(&row[1])?;
                let close = number(&row[2])?;
                let high = number(&row[3])?;
                let low = number(&row[4])?;
                let open = number(&row[5])?;
                Ok(vec![timestamp_s * 1000.0, open, high, low, close, volume])
            })
            .collect()
    }
}
