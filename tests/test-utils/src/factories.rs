//! Factory patterns for generating test data

use chrono::{DateTime, Duration, TimeZone, Utc};
use fake::{Fake, Faker};
use services_common::{
    FeedError, OracleRecommendation, OracleSentiment, PriceSample, PriceSeries, PriceTicker,
};

/// Factory for candle series with minute-spaced timestamps
#[derive(Debug, Clone)]
pub struct PriceSeriesFactory {
    start: DateTime<Utc>,
    step: Duration,
}

impl Default for PriceSeriesFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSeriesFactory {
    pub fn new() -> Self {
        Self {
            start: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
            step: Duration::minutes(1),
        }
    }

    pub fn starting_at(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    /// Candles closing at the given prices, oldest first
    pub fn samples(&self, closes: &[f64]) -> Vec<PriceSample> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let spread = close.abs() * 0.001;
                PriceSample {
                    timestamp: self.start + self.step * i as i32,
                    open: close,
                    high: close + spread,
                    low: close - spread,
                    close,
                    volume: (10.0..500.0).fake::<f64>(),
                }
            })
            .collect()
    }

    pub fn series(&self, closes: &[f64]) -> Result<PriceSeries, FeedError> {
        PriceSeries::new(self.samples(closes))
    }
}

/// Close prices moving by a fixed step each candle
pub fn linear_closes(count: usize, start: f64, step: f64) -> Vec<f64> {
    (0..count).map(|i| start + step * i as f64).collect()
}

pub fn rising_closes(count: usize) -> Vec<f64> {
    linear_closes(count, 100.0, 1.0)
}

pub fn falling_closes(count: usize) -> Vec<f64> {
    linear_closes(count, 100.0 + count as f64, -1.0)
}

pub fn flat_closes(count: usize, price: f64) -> Vec<f64> {
    vec![price; count]
}

/// Bounded random walk starting at `start`
pub fn random_walk(count: usize, start: f64) -> Vec<f64> {
    let mut price = start;
    (0..count)
        .map(|_| {
            let change: f64 = (-0.01..0.01).fake();
            price = (price * (1.0 + change)).max(0.01);
            price
        })
        .collect()
}

pub fn ticker(symbol: &str, price: f64) -> PriceTicker {
    PriceTicker {
        symbol: symbol.to_string(),
        price,
        change_24h: (-5.0..5.0).fake::<f64>(),
        volume_24h: (1_000.0..50_000.0).fake::<f64>(),
        timestamp: Utc::now(),
    }
}

pub fn recommendation(signal: &str, confidence: f64) -> OracleRecommendation {
    OracleRecommendation {
        signal: signal.to_string(),
        confidence,
        reasoning: format!("{signal} on momentum {}", Faker.fake::<u8>()),
        target_price: None,
        stop_loss: None,
        take_profit: None,
    }
}

pub fn sentiment(label: &str, score: f64) -> OracleSentiment {
    OracleSentiment {
        sentiment: label.to_string(),
        score,
        summary: format!("market looks {}", label.to_lowercase()),
    }
}
