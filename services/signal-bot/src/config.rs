//! Static settings for the signal bot

use anyhow::Result;
use serde::{Deserialize, Serialize};
use services_common::constants::{
    DEFAULT_CANDLE_INTERVAL, DEFAULT_CANDLE_LIMIT, DEFAULT_CONFIDENCE_THRESHOLD,
    DEFAULT_CYCLE_PERIOD_SECS, DEFAULT_RECENT_WINDOW, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SYMBOL,
};
use services_common::{FeedClientConfig, OracleClientConfig, ServiceEndpoints};
use std::path::PathBuf;
use std::time::Duration;

/// Signal bot configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotSettings {
    /// HTTP control surface
    pub server: ServerSettings,
    /// Instrument and candle selection
    pub market: MarketSettings,
    /// Cycle timing and signal gating
    pub scheduler: SchedulerSettings,
    /// Upstream endpoints
    pub endpoints: ServiceEndpoints,
    /// Advisory oracle options
    pub advisor: AdvisorSettings,
    /// Persistence location
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSettings {
    /// Trading pair, e.g. `BTCUSDT`
    pub symbol: String,
    /// Candle interval, e.g. `1m`
    pub interval: String,
    /// Number of candles fetched per cycle
    pub candle_limit: u32,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            interval: DEFAULT_CANDLE_INTERVAL.to_string(),
            candle_limit: DEFAULT_CANDLE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// Seconds between cycles; also the staleness horizon
    pub period_secs: u64,
    /// Signals are persisted only when confidence is strictly above this
    pub confidence_threshold: f64,
    /// Deadline for each feed and advisory call
    pub request_timeout_secs: u64,
    /// Trailing closes passed to the advisor
    pub recent_window: usize,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            period_secs: DEFAULT_CYCLE_PERIOD_SECS,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            recent_window: DEFAULT_RECENT_WINDOW,
        }
    }
}

impl SchedulerSettings {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorSettings {
    pub model: String,
    /// Bearer token for the oracle; usually supplied via environment
    pub api_key: Option<String>,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            model: OracleClientConfig::default().model,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory for journals and the runtime config document
    pub data_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl BotSettings {
    /// Load from an optional file layered under `SIGNAL_BOT__*` variables
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("SIGNAL_BOT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Server bind address
    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn feed_client_config(&self) -> FeedClientConfig {
        FeedClientConfig {
            endpoint: self.endpoints.price_feed.clone(),
            request_timeout: self.scheduler.request_timeout_secs,
        }
    }

    pub fn oracle_client_config(&self) -> OracleClientConfig {
        OracleClientConfig {
            endpoint: self.endpoints.advisory.clone(),
            model: self.advisor.model.clone(),
            api_key: self.advisor.api_key.clone(),
            request_timeout: self.scheduler.request_timeout_secs,
        }
    }
}
