//! Price samples, validated price series and 24h tickers

use crate::errors::FeedError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV candle. Immutable once fetched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    /// Candle open time
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Ordered candle sequence with strictly increasing timestamps.
///
/// Construction rejects empty input and any out-of-order or duplicate
/// timestamp, so `latest()` is always defined.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceSeries {
    samples: Vec<PriceSample>,
}

impl PriceSeries {
    /// Validate and wrap a candle list
    pub fn new(samples: Vec<PriceSample>) -> Result<Self, FeedError> {
        if samples.is_empty() {
            return Err(FeedError::Malformed("empty candle series".to_string()));
        }
        if let Some(pair) = samples
            .windows(2)
            .find(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(FeedError::Malformed(format!(
                "candle timestamps not strictly increasing at {}",
                pair[1].timestamp
            )));
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[PriceSample] {
        &self.samples
    }

    /// Most recent candle
    pub fn latest(&self) -> &PriceSample {
        // Non-empty by construction
        &self.samples[self.samples.len() - 1]
    }

    /// Close prices in ascending time order
    pub fn closes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.close).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Current price and 24h statistics for a symbol
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceTicker {
    pub symbol: String,
    /// Last traded price
    pub price: f64,
    /// 24h change in percent
    pub change_24h: f64,
    /// 24h base-asset volume
    pub volume_24h: f64,
    /// Time the ticker was fetched
    pub timestamp: DateTime<Utc>,
}
