//! Upstream client traits and their HTTP implementations

pub mod binance_client;
pub mod oracle_client;

pub use binance_client::BinanceClient;
pub use oracle_client::OracleClient;

use crate::errors::{AdvisoryError, FeedError};
use crate::types::{AdvisoryContext, OracleRecommendation, OracleSentiment, PriceSeries, PriceTicker};
use async_trait::async_trait;

/// Source of current prices and historical candles
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Current price and 24h statistics
    async fn current_price(&self, symbol: &str) -> Result<PriceTicker, FeedError>;

    /// Most recent `limit` candles at `interval`, oldest first
    async fn historical_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<PriceSeries, FeedError>;
}

/// External service producing structured trading recommendations.
///
/// Implementations report every failure as an error; turning those into
/// fallbacks is the advisor's job.
#[async_trait]
pub trait AdvisoryOracle: Send + Sync {
    async fn recommend(
        &self,
        context: &AdvisoryContext,
    ) -> Result<OracleRecommendation, AdvisoryError>;

    /// Sentiment for `symbol`'s market, optionally grounded in news headlines
    async fn sentiment(
        &self,
        symbol: &str,
        news: Option<&[String]>,
    ) -> Result<OracleSentiment, AdvisoryError>;
}
