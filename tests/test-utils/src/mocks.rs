//! Mock collaborators for testing the analysis cycle

use crate::factories::{PriceSeriesFactory, ticker};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use services_common::{
    AdvisoryContext, AdvisoryError, AdvisoryOracle, ConfigStore, ConfigStoreError, FeedError,
    IndicatorSnapshot, LogEntry, MemoryStore, OracleRecommendation, OracleSentiment,
    PersistenceError, PersistenceGateway, PriceFeed, PriceRecord, PriceSeries, PriceTicker,
    TradeSignal,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted price feed
///
/// Serves a fixed close series; the ticker price is the last close. Calls
/// are counted so tests can assert that nothing was fetched.
pub struct MockPriceFeed {
    closes: Mutex<Vec<f64>>,
    fail_status: Mutex<Option<u16>>,
    delay: Mutex<Option<Duration>>,
    ticker_calls: AtomicUsize,
    candle_calls: AtomicUsize,
}

impl std::fmt::Debug for MockPriceFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPriceFeed")
            .field("closes", &self.closes.lock().len())
            .field("fail_status", &*self.fail_status.lock())
            .field("calls", &self.total_calls())
            .finish()
    }
}

impl MockPriceFeed {
    pub fn with_closes(closes: Vec<f64>) -> Self {
        Self {
            closes: Mutex::new(closes),
            fail_status: Mutex::new(None),
            delay: Mutex::new(None),
            ticker_calls: AtomicUsize::new(0),
            candle_calls: AtomicUsize::new(0),
        }
    }

    /// Every call answers with an HTTP error of this status
    pub fn failing(status: u16) -> Self {
        let feed = Self::with_closes(Vec::new());
        feed.fail_with_status(Some(status));
        feed
    }

    pub fn fail_with_status(&self, status: Option<u16>) {
        *self.fail_status.lock() = status;
    }

    /// Sleep before answering each call
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock() = delay;
    }

    pub fn set_closes(&self, closes: Vec<f64>) {
        *self.closes.lock() = closes;
    }

    pub fn ticker_calls(&self) -> usize {
        self.ticker_calls.load(Ordering::SeqCst)
    }

    pub fn candle_calls(&self) -> usize {
        self.candle_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.ticker_calls() + self.candle_calls()
    }

    async fn respond(&self) -> Result<Vec<f64>, FeedError> {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(status) = *self.fail_status.lock() {
            return Err(FeedError::Http { status });
        }
        Ok(self.closes.lock().clone())
    }
}

#[async_trait]
impl PriceFeed for MockPriceFeed {
    async fn current_price(&self, symbol: &str) -> Result<PriceTicker, FeedError> {
        self.ticker_calls.fetch_add(1, Ordering::SeqCst);
        let closes = self.respond().await?;
        let price = closes
            .last()
            .copied()
            .ok_or_else(|| FeedError::Malformed("no price".to_string()))?;
        Ok(ticker(symbol, price))
    }

    async fn historical_candles(
        &self,
        _symbol: &str,
        _interval: &str,
        limit: u32,
    ) -> Result<PriceSeries, FeedError> {
        self.candle_calls.fetch_add(1, Ordering::SeqCst);
        let closes = self.respond().await?;
        let tail = &closes[closes.len().saturating_sub(limit as usize)..];
        PriceSeriesFactory::new().series(tail)
    }
}

/// How the mock oracle answers `recommend`
#[derive(Debug, Clone)]
pub enum OracleBehavior {
    Respond(OracleRecommendation),
    Fail(u16),
    Panic,
    /// Never completes
    Hang,
}

/// Scripted advisory oracle that records the contexts it was given
#[derive(Debug)]
pub struct MockOracle {
    behavior: Mutex<OracleBehavior>,
    sentiment: Mutex<Option<OracleSentiment>>,
    contexts: Mutex<Vec<AdvisoryContext>>,
    calls: AtomicUsize,
}

impl MockOracle {
    pub fn new(behavior: OracleBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            sentiment: Mutex::new(None),
            contexts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn recommending(signal: &str, confidence: f64) -> Self {
        Self::new(OracleBehavior::Respond(crate::factories::recommendation(
            signal, confidence,
        )))
    }

    pub fn failing() -> Self {
        Self::new(OracleBehavior::Fail(500))
    }

    pub fn set_behavior(&self, behavior: OracleBehavior) {
        *self.behavior.lock() = behavior;
    }

    /// Sentiment answer; `None` makes `sentiment` fail
    pub fn set_sentiment(&self, sentiment: Option<OracleSentiment>) {
        *self.sentiment.lock() = sentiment;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn contexts(&self) -> Vec<AdvisoryContext> {
        self.contexts.lock().clone()
    }
}

#[async_trait]
impl AdvisoryOracle for MockOracle {
    async fn recommend(
        &self,
        context: &AdvisoryContext,
    ) -> Result<OracleRecommendation, AdvisoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.contexts.lock().push(context.clone());

        let behavior = self.behavior.lock().clone();
        match behavior {
            OracleBehavior::Respond(recommendation) => Ok(recommendation),
            OracleBehavior::Fail(status) => Err(AdvisoryError::Http { status }),
            OracleBehavior::Panic => panic!("oracle exploded"),
            OracleBehavior::Hang => std::future::pending().await,
        }
    }

    async fn sentiment(
        &self,
        _symbol: &str,
        _news: Option<&[String]>,
    ) -> Result<OracleSentiment, AdvisoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sentiment
            .lock()
            .clone()
            .ok_or_else(|| AdvisoryError::Transport("sentiment unavailable".to_string()))
    }
}

/// In-memory gateway with failure injection and a call counter
#[derive(Debug, Default)]
pub struct MockStore {
    inner: MemoryStore,
    fail_upserts: AtomicBool,
    fail_logs: AtomicBool,
    calls: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_logs(&self, fail: bool) {
        self.fail_logs.store(fail, Ordering::SeqCst);
    }

    /// Write calls made, including failed ones
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn track(&self, fail: bool) -> Result<(), PersistenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if fail {
            return Err(PersistenceError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for MockStore {
    async fn upsert_price(&self, record: &PriceRecord) -> Result<(), PersistenceError> {
        self.track(self.fail_upserts.load(Ordering::SeqCst))?;
        self.inner.upsert_price(record).await
    }

    async fn append_indicator_snapshot(
        &self,
        snapshot: &IndicatorSnapshot,
    ) -> Result<(), PersistenceError> {
        self.track(false)?;
        self.inner.append_indicator_snapshot(snapshot).await
    }

    async fn append_trade_signal(&self, signal: &TradeSignal) -> Result<(), PersistenceError> {
        self.track(false)?;
        self.inner.append_trade_signal(signal).await
    }

    async fn append_log(&self, entry: &LogEntry) -> Result<(), PersistenceError> {
        self.track(self.fail_logs.load(Ordering::SeqCst))?;
        self.inner.append_log(entry).await
    }

    async fn recent_signals(&self, limit: usize) -> Result<Vec<TradeSignal>, PersistenceError> {
        self.inner.recent_signals(limit).await
    }

    async fn latest_price(&self) -> Result<Option<PriceRecord>, PersistenceError> {
        self.inner.latest_price().await
    }
}

/// Config store whose reads always fail
#[derive(Debug, Default)]
pub struct BrokenConfigStore;

#[async_trait]
impl ConfigStore for BrokenConfigStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, ConfigStoreError> {
        Err(ConfigStoreError::Io(std::io::Error::other("config store offline")))
    }

    async fn set(&self, _key: &str, _value: Value) -> Result<(), ConfigStoreError> {
        Err(ConfigStoreError::Io(std::io::Error::other("config store offline")))
    }
}

/// Shared handles for wiring an orchestrator under test
pub struct MockCollaborators {
    pub feed: Arc<MockPriceFeed>,
    pub oracle: Arc<MockOracle>,
    pub store: Arc<MockStore>,
}

impl MockCollaborators {
    pub fn new(closes: Vec<f64>, oracle: MockOracle) -> Self {
        Self {
            feed: Arc::new(MockPriceFeed::with_closes(closes)),
            oracle: Arc::new(oracle),
            store: Arc::new(MockStore::new()),
        }
    }
}
