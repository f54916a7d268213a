//! Advisory recommendations, validated verdicts and persisted trade signals

use crate::constants::{ADVISORY_FALLBACK_REASONING, SENTIMENT_FALLBACK_SUMMARY};
use crate::errors::AdvisoryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recommended action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    Buy,
    Sell,
    Hold,
}

impl SignalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalType {
    type Err = AdvisoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            "HOLD" => Ok(Self::Hold),
            other => Err(AdvisoryError::Schema(format!("unknown signal type {other:?}"))),
        }
    }
}

/// Raw recommendation as decoded from the oracle, before validation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleRecommendation {
    pub signal: String,
    pub confidence: f64,
    pub reasoning: String,
    #[serde(default)]
    pub target_price: Option<f64>,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub take_profit: Option<f64>,
}

/// Validated advisory output. Confidence is always within [0, 1].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryVerdict {
    pub signal_type: SignalType,
    pub confidence: f64,
    pub reasoning: String,
    pub target_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

impl AdvisoryVerdict {
    pub fn new(signal_type: SignalType, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self {
            signal_type,
            confidence: clamp_unit(confidence),
            reasoning: reasoning.into(),
            target_price: None,
            stop_loss: None,
            take_profit: None,
        }
    }

    /// Deterministic verdict used whenever the oracle cannot be trusted
    pub fn fallback() -> Self {
        Self::new(SignalType::Hold, 0.0, ADVISORY_FALLBACK_REASONING)
    }

    pub fn is_fallback(&self) -> bool {
        self.signal_type == SignalType::Hold
            && self.confidence == 0.0
            && self.reasoning == ADVISORY_FALLBACK_REASONING
    }
}

impl TryFrom<OracleRecommendation> for AdvisoryVerdict {
    type Error = AdvisoryError;

    fn try_from(raw: OracleRecommendation) -> Result<Self, Self::Error> {
        let signal_type = raw.signal.parse::<SignalType>()?;
        if !raw.confidence.is_finite() || !(0.0..=1.0).contains(&raw.confidence) {
            return Err(AdvisoryError::Schema(format!(
                "confidence {} outside [0, 1]",
                raw.confidence
            )));
        }
        let target_price = validate_level("targetPrice", raw.target_price)?;
        let stop_loss = validate_level("stopLoss", raw.stop_loss)?;
        let take_profit = validate_level("takeProfit", raw.take_profit)?;

        Ok(Self {
            target_price,
            stop_loss,
            take_profit,
            ..Self::new(signal_type, raw.confidence, raw.reasoning)
        })
    }
}

fn validate_level(field: &str, value: Option<f64>) -> Result<Option<f64>, AdvisoryError> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(AdvisoryError::Schema(format!(
            "{field} must be a positive price, got {v}"
        ))),
        other => Ok(other),
    }
}

/// Clamp to [0, 1]; NaN collapses to 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Persisted trading recommendation. Immutable once written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub signal_type: SignalType,
    pub confidence: f64,
    /// Market price when the signal was generated
    pub price: f64,
    pub reasoning: String,
    pub target_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

impl TradeSignal {
    pub fn from_verdict(
        verdict: &AdvisoryVerdict,
        symbol: impl Into<String>,
        price: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            symbol: symbol.into(),
            signal_type: verdict.signal_type,
            confidence: clamp_unit(verdict.confidence),
            price,
            reasoning: verdict.reasoning.clone(),
            target_price: verdict.target_price,
            stop_loss: verdict.stop_loss,
            take_profit: verdict.take_profit,
        }
    }
}

/// Overall market mood
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Bullish,
    Bearish,
    Neutral,
}

/// Raw sentiment as decoded from the oracle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OracleSentiment {
    pub sentiment: String,
    pub score: f64,
    pub summary: String,
}

/// Validated sentiment assessment, score within [-1, 1]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    pub sentiment: SentimentLabel,
    pub score: f64,
    pub summary: String,
}

impl SentimentReport {
    pub fn fallback() -> Self {
        Self {
            sentiment: SentimentLabel::Neutral,
            score: 0.0,
            summary: SENTIMENT_FALLBACK_SUMMARY.to_string(),
        }
    }
}

impl TryFrom<OracleSentiment> for SentimentReport {
    type Error = AdvisoryError;

    fn try_from(raw: OracleSentiment) -> Result<Self, Self::Error> {
        let sentiment = match raw.sentiment.as_str() {
            "BULLISH" => SentimentLabel::Bullish,
            "BEARISH" => SentimentLabel::Bearish,
            "NEUTRAL" => SentimentLabel::Neutral,
            other => {
                return Err(AdvisoryError::Schema(format!("unknown sentiment {other:?}")));
            }
        };
        if !raw.score.is_finite() || !(-1.0..=1.0).contains(&raw.score) {
            return Err(AdvisoryError::Schema(format!(
                "sentiment score {} outside [-1, 1]",
                raw.score
            )));
        }
        Ok(Self {
            sentiment,
            score: raw.score,
            summary: raw.summary,
        })
    }
}
