use crate::client::ExchangeClient;
use crate::error::GatewayError;
use crate::http::{as_array, get_json, number};
use arbspread_config::Interval;
use arbspread_types::RawCandleRow;
use async_trait::async_trait;

pub struct BybitClient {
    http: reqwest::Client,
    base_url: String,
}

impl BybitClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: "https://api.bybit.com".to_string(),
        }
    }

    fn interval_param(interval: Interval) -> &'static str {
        match interval {
            Interval::FiveMinutes => "5",
            Interval::ThirtyMinutes => "30",
            Interval::OneHour => "60",
            Interval::FourHours => "240",
            Interval::OneDay => "D",
            Interval::OneWeek => "W",
            Interval::OneMonth => "M",
        }
    }
}

#[async_trait]
impl ExchangeClient for BybitClient {
    async fn list_markets(&self) -> Result<Vec<String>, GatewayError> {
        let url = format!("{}/v5/market/instruments-info?category=spot", self.base_url);
        let body = get_json(&self.http, &url).await?;
        let list = as_array(&body["result"]["list"], "result.list")?;
        Ok(list.iter().filter_map(|s| s["symbol"].as_str().map(str::to_string)).collect())
    }

    async fn fetch_ohlcv(&self, symbol: &str, interval: Interval) -> Result<Vec<RawCandleRow>, GatewayError> {
        let url = format!(
            "{}/v5/market/kline?category=spot&symbol={symbol}&interval={}&limit=200",
            self.base_url,
            Self::interval_param(interval)
        );
        let body = get_json(&self.http, &url).await?;
        let rows = as_array(&body["result"]["list"], "result.list")?;
        let mut candles = rows
            .iter()
            .map(|row| {
                let row = as_array(row, "kline row")?;
                let mut candle = Vec::with_capacity(6);
                for field in row.iter().take(6) {
                    candle.push(number(field)?);
                }
                Ok(candle)
            })
            .collect::<Result<Vec<RawCandleRow>, GatewayError>>()?;
        // Bybit v5 also returns newest-first.
        candles.reverse();
        Ok(candles)
    }
}
