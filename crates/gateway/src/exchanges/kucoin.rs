use crate::client::ExchangeClient;
use crate::error::GatewayError;
use crate::http::{as_array, get_json, number};
use arbspread_config::Interval;
use arbspread_types::RawCandleRow;
use async_trait::async_trait;

pub struct KucoinClient {
    http: reqwest::Client,
    base_url: String,
}

impl KucoinClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: "https://api.kucoin.com".to_string(),
        }
    }

    /// KuCoin has no native monthly candle type; `fetch_ohlcv` rejects it so
    /// that PE is treated as absent for that interval (spec §4.1).
    fn type_param(interval: Interval) -> Result<&'static str, GatewayError> {
        match interval {
            Interval::FiveMinutes => Ok("5min"),
            Interval::ThirtyMinutes => Ok("30min"),
            Interval::OneHour => Ok("1hour"),
            Interval::FourHours => Ok("4hour"),
            Interval::OneDay => Ok("1day"),
            Interval::OneWeek => Ok("1week"),
            Interval::OneMonth => Err(GatewayError::ExchangeRejected(
                "kucoin does not offer a monthly candle type".to_string(),
            )),
        }
    }
}

#[async_trait]
impl ExchangeClient for KucoinClient {
    async fn list_markets(&self) -> Result<Vec<String>, GatewayError> {
        let url = format!("{}/api/v1/symbols", self.base_url);
        let body = get_json(&self.http, &url).await?;
        let data = as_array(&body["data"], "data")?;
        Ok(data
            .iter()
            .filter(|s| s["enableTrading"] == true)
            .filter_map(|s| s["symbol"].as_str().map(str::to_string))
            .collect())
    }

    async fn fetch_ohlcv(&self, symbol: &str, interval: Interval) -> Result<Vec<RawCandleRow>, GatewayError> {
        let type_param = Self::type_param(interval)?;
        let url = format!(
            "{}/api/v1/market/candles?symbol={symbol}&type={type_param}",
            self.base_url
        );
        let body = get_json(&self.http, &url).await?;
        let rows = as_array(&body["data"], "data")?;
        let mut candles = rows
            .iter()
            .map(|row| {
                let row = as_array(row, "candle row")?;
                if row.len() < 7 {
                    return Err(GatewayError::Decode(format!("expected 7 candle fields, got {}", row.len())));
                }
                // KuCoin orders fields [time(s), open, close, high, low, volume, turnover];
                // reorder to [time(ms), open, high, low, close, volume].
                let timestamp_s = number(&row[0])?;
                let open = number(&row[1])?;
                let close = number(&row[2])?;
                let high = number(&row[3])?;
                let low = number(&row[4])?;
                let volume = number(&row[5])?;
                Ok(vec![timestamp_s * 1000.0, open, high, low, close, volume])
            })
            .collect::<Result<Vec<RawCandleRow>, GatewayError>>()?;
        // KuCoin also returns newest-first.
        candles.reverse();
        Ok(candles)
    }
}
