//! Indicator outputs, trend labels and the advisory context

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// MACD line, signal line and histogram
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdValues {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Bollinger envelope around the middle SMA
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Full indicator set computed from one cycle's close prices
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// Relative Strength Index in [0, 100]
    pub rsi: f64,
    pub macd: MacdValues,
    pub bollinger: BollingerBands,
    pub ema20: f64,
    pub ema50: f64,
    pub sma200: f64,
}

/// Timestamped indicator set as written to the persistence gateway
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    #[serde(flatten)]
    pub indicators: IndicatorSet,
}

/// Coarse direction of recent prices
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketTrend {
    Uptrend,
    Downtrend,
    Sideways,
}

impl MarketTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uptrend => "UPTREND",
            Self::Downtrend => "DOWNTREND",
            Self::Sideways => "SIDEWAYS",
        }
    }
}

impl fmt::Display for MarketTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market context handed to the advisory oracle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryContext {
    pub symbol: String,
    pub current_price: f64,
    pub indicators: IndicatorSet,
    /// Trailing close prices, oldest first
    pub recent_closes: Vec<f64>,
    pub volume_24h: f64,
    pub trend: MarketTrend,
}
