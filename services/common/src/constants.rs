//! Common constants used across the signal services
//!
//! Single source of truth for thresholds, periods and storage keys

// Scheduling
/// Period between analysis cycles
pub const DEFAULT_CYCLE_PERIOD_SECS: u64 = 60;
/// Deadline applied to each price feed and advisory call
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Market data
pub const DEFAULT_SYMBOL: &str = "BTCUSDT";
pub const DEFAULT_CANDLE_INTERVAL: &str = "1m";
pub const DEFAULT_CANDLE_LIMIT: u32 = 100;

// Signal gating
/// Minimum advisory confidence (exclusive) required to persist a signal
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;
/// Number of trailing closes handed to the advisory oracle
pub const DEFAULT_RECENT_WINDOW: usize = 10;

// Runtime configuration keys
pub const TRADING_ENABLED_KEY: &str = "trading_enabled";

// Advisory fallbacks
pub const ADVISORY_FALLBACK_REASONING: &str = "advisory unavailable";
pub const SENTIMENT_FALLBACK_SUMMARY: &str = "sentiment unavailable";

// Dashboard read surface
pub const DASHBOARD_SIGNAL_LIMIT: usize = 5;
/// Newest signals a gateway keeps in memory for `recent_signals`
pub const RECENT_SIGNAL_CAPACITY: usize = 100;
