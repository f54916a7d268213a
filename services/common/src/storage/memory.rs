//! In-process storage backends

use super::{ConfigStore, PersistenceGateway, PriceRecord};
use crate::constants::RECENT_SIGNAL_CAPACITY;
use crate::errors::{ConfigStoreError, PersistenceError};
use crate::types::{IndicatorSnapshot, LogEntry, TradeSignal};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};

#[derive(Debug, Default)]
struct Tables {
    prices: BTreeMap<(String, DateTime<Utc>), PriceRecord>,
    indicators: Vec<IndicatorSnapshot>,
    /// Newest `RECENT_SIGNAL_CAPACITY` signals
    signals: VecDeque<TradeSignal>,
    logs: Vec<LogEntry>,
}

/// Persistence gateway holding everything in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prices(&self) -> Vec<PriceRecord> {
        self.tables.lock().prices.values().cloned().collect()
    }

    pub fn indicator_snapshots(&self) -> Vec<IndicatorSnapshot> {
        self.tables.lock().indicators.clone()
    }

    pub fn trade_signals(&self) -> Vec<TradeSignal> {
        self.tables.lock().signals.iter().cloned().collect()
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.tables.lock().logs.clone()
    }
}

#[async_trait]
impl PersistenceGateway for MemoryStore {
    async fn upsert_price(&self, record: &PriceRecord) -> Result<(), PersistenceError> {
        let key = (record.symbol.clone(), record.sample.timestamp);
        self.tables.lock().prices.insert(key, record.clone());
        Ok(())
    }

    async fn append_indicator_snapshot(
        &self,
        snapshot: &IndicatorSnapshot,
    ) -> Result<(), PersistenceError> {
        self.tables.lock().indicators.push(snapshot.clone());
        Ok(())
    }

    async fn append_trade_signal(&self, signal: &TradeSignal) -> Result<(), PersistenceError> {
        let mut tables = self.tables.lock();
        if tables.signals.len() == RECENT_SIGNAL_CAPACITY {
            tables.signals.pop_front();
        }
        tables.signals.push_back(signal.clone());
        Ok(())
    }

    async fn append_log(&self, entry: &LogEntry) -> Result<(), PersistenceError> {
        self.tables.lock().logs.push(entry.clone());
        Ok(())
    }

    async fn recent_signals(&self, limit: usize) -> Result<Vec<TradeSignal>, PersistenceError> {
        let tables = self.tables.lock();
        Ok(tables.signals.iter().rev().take(limit).cloned().collect())
    }

    async fn latest_price(&self) -> Result<Option<PriceRecord>, PersistenceError> {
        let tables = self.tables.lock();
        Ok(tables
            .prices
            .values()
            .max_by_key(|record| record.sample.timestamp)
            .cloned())
    }
}

/// Runtime configuration held in memory
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one key
    pub fn with_value(key: &str, value: Value) -> Self {
        let store = Self::default();
        store.values.write().insert(key.to_string(), value);
        store
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, ConfigStoreError> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), ConfigStoreError> {
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }
}
