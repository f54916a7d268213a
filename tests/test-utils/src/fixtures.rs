//! Test fixtures for common test data

use crate::factories::{falling_closes, flat_closes, rising_closes};
use rstest::*;
use serde_json::Value;
use services_common::constants::TRADING_ENABLED_KEY;
use services_common::MemoryConfigStore;
use tempfile::TempDir;

/// 120 steadily rising closes starting at 100
#[fixture]
pub fn uptrend() -> Vec<f64> {
    rising_closes(120)
}

/// 120 steadily falling closes ending at 101
#[fixture]
pub fn downtrend() -> Vec<f64> {
    falling_closes(120)
}

#[fixture]
pub fn sideways() -> Vec<f64> {
    flat_closes(120, 100.0)
}

/// Runtime config with trading switched on
#[fixture]
pub fn enabled_config() -> MemoryConfigStore {
    MemoryConfigStore::with_value(TRADING_ENABLED_KEY, Value::Bool(true))
}

#[fixture]
pub fn disabled_config() -> MemoryConfigStore {
    MemoryConfigStore::with_value(TRADING_ENABLED_KEY, Value::Bool(false))
}

/// Fresh directory removed when the fixture is dropped
#[fixture]
pub fn data_dir() -> TempDir {
    TempDir::new().unwrap_or_else(|e| panic!("temp dir: {e}"))
}
