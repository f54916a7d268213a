//! Periodic market-analysis bot
//!
//! Each cycle fetches candles from the price feed, derives technical
//! indicators and a trend label, asks the advisory oracle for a
//! recommendation and records confident signals. Features:
//! - Indicator engine (RSI, EMA, SMA, Bollinger Bands, MACD)
//! - Non-throwing advisory boundary with deterministic fallback
//! - Reentrancy-guarded scheduler that survives any single failure
//! - start/stop control surface over HTTP

pub mod advisor;
pub mod config;
pub mod control;
pub mod indicators;
pub mod orchestrator;
pub mod server;
pub mod trend;

pub use advisor::SignalAdvisor;
pub use config::BotSettings;
pub use control::{ControlCommand, ControlError, ControlResponse};
pub use orchestrator::{
    CycleError, CycleOutcome, CycleReport, Orchestrator, OrchestratorDeps, OrchestratorError,
    SkipReason, StartOutcome, StopOutcome,
};
pub use trend::determine_trend;
