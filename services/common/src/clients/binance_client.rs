//! Binance REST price feed client

use crate::clients::PriceFeed;
use crate::config::FeedClientConfig;
use crate::errors::FeedError;
use crate::types::{PriceSample, PriceSeries, PriceTicker};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// `GET /api/v3/ticker/24hr` payload (numbers arrive as decimal strings)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker24h {
    symbol: String,
    last_price: String,
    price_change_percent: String,
    volume: String,
}

/// Price feed backed by the Binance public REST API
#[derive(Debug, Clone)]
pub struct BinanceClient {
    client: Client,
    config: FeedClientConfig,
}

impl BinanceClient {
    pub fn new(config: FeedClientConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(concat!("signal-bot/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .map_err(|e| FeedError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FeedError> {
        let response = self.client.get(self.url(path)).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, path, "Price feed returned non-success status");
            return Err(FeedError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FeedError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl PriceFeed for BinanceClient {
    async fn current_price(&self, symbol: &str) -> Result<PriceTicker, FeedError> {
        let ticker: Ticker24h = self
            .get_json("/api/v3/ticker/24hr", &[("symbol", symbol.to_string())])
            .await?;

        Ok(PriceTicker {
            price: parse_decimal(&ticker.last_price, "lastPrice")?,
            change_24h: parse_decimal(&ticker.price_change_percent, "priceChangePercent")?,
            volume_24h: parse_decimal(&ticker.volume, "volume")?,
            symbol: ticker.symbol,
            timestamp: Utc::now(),
        })
    }

    async fn historical_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<PriceSeries, FeedError> {
        let rows: Vec<Vec<Value>> = self
            .get_json(
                "/api/v3/klines",
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", interval.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        debug!(symbol, interval, rows = rows.len(), "Fetched klines");

        let samples = rows
            .iter()
            .map(|row| parse_kline(row))
            .collect::<Result<Vec<_>, _>>()?;
        PriceSeries::new(samples)
    }
}

/// Kline row: `[openTime, open, high, low, close, volume, ...]`
fn parse_kline(row: &[Value]) -> Result<PriceSample, FeedError> {
    if row.len() < 6 {
        return Err(FeedError::Malformed(format!(
            "kline row has {} fields, expected at least 6",
            row.len()
        )));
    }

    let open_time = row[0]
        .as_i64()
        .ok_or_else(|| FeedError::Malformed("kline open time is not an integer".to_string()))?;
    let timestamp = DateTime::<Utc>::from_timestamp_millis(open_time)
        .ok_or_else(|| FeedError::Malformed(format!("kline open time {open_time} out of range")))?;

    Ok(PriceSample {
        timestamp,
        open: value_to_f64(&row[1], "open")?,
        high: value_to_f64(&row[2], "high")?,
        low: value_to_f64(&row[3], "low")?,
        close: value_to_f64(&row[4], "close")?,
        volume: value_to_f64(&row[5], "volume")?,
    })
}

fn value_to_f64(value: &Value, field: &str) -> Result<f64, FeedError> {
    match value {
        Value::String(s) => parse_decimal(s, field),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| FeedError::Malformed(format!("{field} is not representable as f64"))),
        other => Err(FeedError::Malformed(format!("{field} has unexpected type: {other}"))),
    }
}

fn parse_decimal(raw: &str, field: &str) -> Result<f64, FeedError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FeedError::Malformed(format!("{field} is not a number: {raw:?}")))
}
