//! Persistence gateway and runtime configuration store

pub mod config_file;
pub mod journal;
pub mod memory;

pub use config_file::FileConfigStore;
pub use journal::JournalStore;
pub use memory::{MemoryConfigStore, MemoryStore};

use crate::constants::TRADING_ENABLED_KEY;
use crate::errors::{ConfigStoreError, PersistenceError};
use crate::types::{IndicatorSnapshot, LogEntry, PriceSample, TradeSignal};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored candle, unique per (symbol, timestamp)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub symbol: String,
    #[serde(flatten)]
    pub sample: PriceSample,
}

/// Durable sink for prices, indicator snapshots, trade signals and logs.
///
/// A write is complete only once it is durable.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Insert or replace the candle with the same symbol and timestamp
    async fn upsert_price(&self, record: &PriceRecord) -> Result<(), PersistenceError>;

    async fn append_indicator_snapshot(
        &self,
        snapshot: &IndicatorSnapshot,
    ) -> Result<(), PersistenceError>;

    async fn append_trade_signal(&self, signal: &TradeSignal) -> Result<(), PersistenceError>;

    async fn append_log(&self, entry: &LogEntry) -> Result<(), PersistenceError>;

    /// Up to `limit` signals, most recent first. Only the newest
    /// `RECENT_SIGNAL_CAPACITY` are reachable through this call.
    async fn recent_signals(&self, limit: usize) -> Result<Vec<TradeSignal>, PersistenceError>;

    /// Newest stored candle across all symbols
    async fn latest_price(&self) -> Result<Option<PriceRecord>, PersistenceError>;
}

/// Key/value runtime configuration owned by the control surface
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, ConfigStoreError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), ConfigStoreError>;
}

/// Whether analysis cycles should run. Absent or non-boolean means disabled.
pub async fn trading_enabled(store: &dyn ConfigStore) -> Result<bool, ConfigStoreError> {
    Ok(matches!(
        store.get(TRADING_ENABLED_KEY).await?,
        Some(Value::Bool(true))
    ))
}
