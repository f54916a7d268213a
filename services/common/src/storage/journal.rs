//! File-backed persistence gateway
//!
//! One JSON-lines file per table under the data directory. Every append
//! is fsynced before returning. The price table is rewritten atomically
//! (temp file + rename) when an existing candle is replaced, so it never
//! holds two records for the same key. In-memory indexes change only after
//! the matching write has succeeded.

use super::{PersistenceGateway, PriceRecord};
use crate::constants::RECENT_SIGNAL_CAPACITY;
use crate::errors::PersistenceError;
use crate::types::{IndicatorSnapshot, LogEntry, TradeSignal};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

const PRICES_FILE: &str = "prices.jsonl";
const INDICATORS_FILE: &str = "indicators.jsonl";
const SIGNALS_FILE: &str = "signals.jsonl";
const LOGS_FILE: &str = "logs.jsonl";

#[derive(Debug, Default)]
struct JournalState {
    price_keys: BTreeSet<(String, DateTime<Utc>)>,
    latest_price: Option<PriceRecord>,
    /// Newest `RECENT_SIGNAL_CAPACITY` signals
    signals: VecDeque<TradeSignal>,
}

impl JournalState {
    fn observe_price(&mut self, record: &PriceRecord) {
        let newer = self
            .latest_price
            .as_ref()
            .is_none_or(|latest| record.sample.timestamp >= latest.sample.timestamp);
        if newer {
            self.latest_price = Some(record.clone());
        }
    }

    fn push_signal(&mut self, signal: TradeSignal) {
        if self.signals.len() == RECENT_SIGNAL_CAPACITY {
            self.signals.pop_front();
        }
        self.signals.push_back(signal);
    }
}

/// JSON-lines journal under a data directory
#[derive(Debug)]
pub struct JournalStore {
    dir: PathBuf,
    state: Mutex<JournalState>,
}

impl JournalStore {
    /// Open (creating if needed) the journal in `dir` and load its indexes
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;

        let mut state = JournalState::default();
        for record in read_lines::<PriceRecord>(&dir.join(PRICES_FILE)).await? {
            state.observe_price(&record);
            state
                .price_keys
                .insert((record.symbol, record.sample.timestamp));
        }
        for signal in read_lines::<TradeSignal>(&dir.join(SIGNALS_FILE)).await? {
            state.push_signal(signal);
        }

        info!(
            dir = %dir.display(),
            prices = state.price_keys.len(),
            signals = state.signals.len(),
            "Opened journal store"
        );

        Ok(Self {
            dir,
            state: Mutex::new(state),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn append<T: Serialize>(&self, file: &str, record: &T) -> Result<(), PersistenceError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(file))
            .await?;
        handle.write_all(&line).await?;
        handle.sync_data().await?;
        Ok(())
    }

    /// Rewrite the price table with `record` in place of the stored candle
    /// sharing its key
    async fn replace_price(&self, record: &PriceRecord) -> Result<(), PersistenceError> {
        let target = self.dir.join(PRICES_FILE);
        let mut records = read_lines::<PriceRecord>(&target).await?;
        match records.iter_mut().find(|stored| {
            stored.symbol == record.symbol && stored.sample.timestamp == record.sample.timestamp
        }) {
            Some(stored) => *stored = record.clone(),
            None => records.push(record.clone()),
        }

        let mut buf = Vec::new();
        for record in &records {
            serde_json::to_writer(&mut buf, record)?;
            buf.push(b'\n');
        }

        let tmp = self.dir.join(format!("{PRICES_FILE}.tmp"));
        let mut handle = fs::File::create(&tmp).await?;
        handle.write_all(&buf).await?;
        handle.sync_all().await?;
        fs::rename(&tmp, &target).await?;
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for JournalStore {
    async fn upsert_price(&self, record: &PriceRecord) -> Result<(), PersistenceError> {
        let mut state = self.state.lock().await;
        let key = (record.symbol.clone(), record.sample.timestamp);

        if state.price_keys.contains(&key) {
            debug!(timestamp = %record.sample.timestamp, "Replacing stored candle");
            self.replace_price(record).await?;
        } else {
            self.append(PRICES_FILE, record).await?;
            state.price_keys.insert(key);
        }
        state.observe_price(record);
        Ok(())
    }

    async fn append_indicator_snapshot(
        &self,
        snapshot: &IndicatorSnapshot,
    ) -> Result<(), PersistenceError> {
        let _guard = self.state.lock().await;
        self.append(INDICATORS_FILE, snapshot).await
    }

    async fn append_trade_signal(&self, signal: &TradeSignal) -> Result<(), PersistenceError> {
        let mut state = self.state.lock().await;
        self.append(SIGNALS_FILE, signal).await?;
        state.push_signal(signal.clone());
        Ok(())
    }

    async fn append_log(&self, entry: &LogEntry) -> Result<(), PersistenceError> {
        let _guard = self.state.lock().await;
        self.append(LOGS_FILE, entry).await
    }

    async fn recent_signals(&self, limit: usize) -> Result<Vec<TradeSignal>, PersistenceError> {
        let state = self.state.lock().await;
        Ok(state.signals.iter().rev().take(limit).cloned().collect())
    }

    async fn latest_price(&self) -> Result<Option<PriceRecord>, PersistenceError> {
        Ok(self.state.lock().await.latest_price.clone())
    }
}

/// Decode every non-blank line of a JSON-lines file; a missing file is empty
async fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, PersistenceError> {
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(PersistenceError::from))
        .collect()
}
