//! Analysis cycle driver and its start/stop state machine
//!
//! The orchestrator is either stopped or running. While running, a single
//! scheduler task ticks at the configured period and spawns one cycle per
//! tick. A tick that arrives while the previous cycle is still in flight is
//! dropped. Every cycle failure is logged once and swallowed; nothing a
//! collaborator does can tear the scheduler down.

use crate::advisor::SignalAdvisor;
use crate::config::BotSettings;
use crate::indicators::analyze_all;
use crate::trend::determine_trend;
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::json;
use services_common::{
    AdvisoryContext, AdvisoryVerdict, ConfigStore, ConfigStoreError, FeedError, IndicatorSet,
    IndicatorSnapshot, LogEntry, LogLevel, MarketTrend, PersistenceError, PersistenceGateway,
    PriceFeed, PriceRecord, TradeSignal, trading_enabled,
};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Shortest period the scheduler accepts
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Failure that aborts a single cycle
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    ConfigStore(#[from] ConfigStoreError),
}

/// Failure to change the scheduling state
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("No tokio runtime available to host the scheduler")]
    NoRuntime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    AlreadyStopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Another cycle held the reentrancy guard
    Busy,
}

/// What one cycle did
#[derive(Clone, Debug, PartialEq)]
pub enum CycleOutcome {
    Skipped(SkipReason),
    /// Trading is switched off; nothing was fetched or written
    Disabled,
    Completed(CycleReport),
    /// The cycle aborted; the error has already been logged
    Failed(String),
}

/// Summary of a completed cycle
#[derive(Clone, Debug, PartialEq)]
pub struct CycleReport {
    pub symbol: String,
    pub price: f64,
    pub indicators: IndicatorSet,
    pub trend: MarketTrend,
    pub verdict: AdvisoryVerdict,
    pub signal_persisted: bool,
}

/// Collaborators injected into the orchestrator
pub struct OrchestratorDeps {
    pub feed: Arc<dyn PriceFeed>,
    pub advisor: SignalAdvisor,
    pub store: Arc<dyn PersistenceGateway>,
    pub config: Arc<dyn ConfigStore>,
}

pub struct Orchestrator {
    runner: Arc<CycleRunner>,
    /// Present while running; cancelling it ends the scheduler task
    scheduler: Mutex<Option<CancellationToken>>,
}

impl Orchestrator {
    pub fn new(deps: OrchestratorDeps, settings: BotSettings) -> Self {
        Self {
            runner: Arc::new(CycleRunner {
                feed: deps.feed,
                advisor: deps.advisor,
                store: deps.store,
                config: deps.config,
                settings,
                busy: Arc::new(AtomicBool::new(false)),
                last_refresh: Mutex::new(None),
            }),
            scheduler: Mutex::new(None),
        }
    }

    /// Arm the periodic scheduler. The first cycle runs immediately.
    ///
    /// Idempotent: a second call while running arms nothing.
    pub fn start(&self) -> Result<StartOutcome, OrchestratorError> {
        let mut scheduler = self.scheduler.lock();
        if scheduler.is_some() {
            return Ok(StartOutcome::AlreadyRunning);
        }

        let handle = Handle::try_current().map_err(|_| OrchestratorError::NoRuntime)?;
        let token = CancellationToken::new();
        let runner = Arc::clone(&self.runner);
        let cancel = token.clone();
        handle.spawn(async move { runner.schedule(cancel).await });
        *scheduler = Some(token);

        info!(
            symbol = %self.runner.settings.market.symbol,
            period_secs = self.runner.settings.scheduler.period_secs,
            "Signal bot started"
        );
        Ok(StartOutcome::Started)
    }

    /// Cancel the scheduler. An in-flight cycle is left to finish.
    pub fn stop(&self) -> StopOutcome {
        match self.scheduler.lock().take() {
            Some(token) => {
                token.cancel();
                info!("Signal bot stopped");
                StopOutcome::Stopped
            }
            None => StopOutcome::AlreadyStopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.lock().is_some()
    }

    /// Run one cycle now, honouring the reentrancy guard
    pub async fn run_cycle(&self) -> CycleOutcome {
        match CycleGuard::acquire(&self.runner.busy) {
            Some(guard) => self.runner.execute(guard).await,
            None => CycleOutcome::Skipped(SkipReason::Busy),
        }
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        if let Some(token) = self.scheduler.get_mut().take() {
            token.cancel();
        }
    }
}

/// Holds the busy flag for the duration of one cycle
struct CycleGuard {
    busy: Arc<AtomicBool>,
}

impl CycleGuard {
    fn acquire(busy: &Arc<AtomicBool>) -> Option<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                busy: Arc::clone(busy),
            })
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

struct CycleRunner {
    feed: Arc<dyn PriceFeed>,
    advisor: SignalAdvisor,
    store: Arc<dyn PersistenceGateway>,
    config: Arc<dyn ConfigStore>,
    settings: BotSettings,
    busy: Arc<AtomicBool>,
    /// When market data was last marked fresh; `None` until the first cycle
    last_refresh: Mutex<Option<Instant>>,
}

impl CycleRunner {
    async fn schedule(self: Arc<Self>, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.settings.scheduler.period().max(MIN_PERIOD));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let Some(guard) = CycleGuard::acquire(&self.busy) else {
                        debug!("Previous cycle still running, skipping tick");
                        continue;
                    };
                    let runner = Arc::clone(&self);
                    tokio::spawn(async move {
                        runner.execute(guard).await;
                    });
                }
            }
        }

        debug!("Scheduler task exited");
    }

    async fn execute(&self, _guard: CycleGuard) -> CycleOutcome {
        let result = match trading_enabled(self.config.as_ref()).await {
            Ok(false) => {
                debug!("Trading disabled, skipping cycle");
                return CycleOutcome::Disabled;
            }
            Ok(true) => self.analyze().await,
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(report) => CycleOutcome::Completed(report),
            Err(e) => {
                let detail = e.to_string();
                let entry = LogEntry::error("analysis cycle failed")
                    .with_payload(json!({ "error": detail }));
                if let Err(persist_err) = self.record(entry).await {
                    error!(error = %persist_err, "Failed to persist cycle error");
                }
                CycleOutcome::Failed(detail)
            }
        }
    }

    async fn analyze(&self) -> Result<CycleReport, CycleError> {
        let market = &self.settings.market;
        let scheduler = &self.settings.scheduler;

        let ticker = self.bounded(self.feed.current_price(&market.symbol)).await?;
        let series = self
            .bounded(
                self.feed
                    .historical_candles(&market.symbol, &market.interval, market.candle_limit),
            )
            .await?;

        if self.is_stale() {
            self.record(
                LogEntry::warn("market data is stale, refreshing")
                    .with_payload(json!({ "symbol": market.symbol })),
            )
            .await?;
            *self.last_refresh.lock() = Some(Instant::now());
        }

        self.store
            .upsert_price(&PriceRecord {
                symbol: market.symbol.clone(),
                sample: series.latest().clone(),
            })
            .await?;

        let closes = series.closes();
        let indicators = analyze_all(&closes);
        self.store
            .append_indicator_snapshot(&IndicatorSnapshot {
                timestamp: Utc::now(),
                symbol: market.symbol.clone(),
                indicators,
            })
            .await?;

        let trend = determine_trend(&closes);
        let context = AdvisoryContext {
            symbol: market.symbol.clone(),
            current_price: ticker.price,
            indicators,
            recent_closes: closes[closes.len().saturating_sub(scheduler.recent_window)..].to_vec(),
            volume_24h: ticker.volume_24h,
            trend,
        };
        let verdict = self.advisor.analyze(&context).await;

        let signal_persisted = verdict.confidence > scheduler.confidence_threshold;
        if signal_persisted {
            let signal =
                TradeSignal::from_verdict(&verdict, market.symbol.clone(), ticker.price, Utc::now());
            self.store.append_trade_signal(&signal).await?;
            self.record(
                LogEntry::info(format!(
                    "signal generated: {} with confidence {}",
                    signal.signal_type, signal.confidence
                ))
                .with_payload(json!({
                    "symbol": signal.symbol,
                    "price": signal.price,
                    "reasoning": signal.reasoning,
                })),
            )
            .await?;
        }

        debug!(
            symbol = %market.symbol,
            trend = %trend,
            signal = %verdict.signal_type,
            confidence = verdict.confidence,
            signal_persisted,
            "Analysis cycle completed"
        );

        Ok(CycleReport {
            symbol: market.symbol.clone(),
            price: ticker.price,
            indicators,
            trend,
            verdict,
            signal_persisted,
        })
    }

    /// Apply the request deadline to a feed call
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, FeedError>>,
    ) -> Result<T, FeedError> {
        let limit = self.settings.scheduler.request_timeout();
        tokio::time::timeout(limit, call)
            .await
            .map_err(|_| FeedError::Timeout(limit.as_secs()))?
    }

    fn is_stale(&self) -> bool {
        self.last_refresh
            .lock()
            .is_none_or(|at| at.elapsed() > self.settings.scheduler.period())
    }

    /// Persist a log entry and mirror it to tracing
    async fn record(&self, entry: LogEntry) -> Result<(), PersistenceError> {
        match entry.level {
            LogLevel::Info => info!(payload = ?entry.payload, "{}", entry.message),
            LogLevel::Warn => warn!(payload = ?entry.payload, "{}", entry.message),
            LogLevel::Error => error!(payload = ?entry.payload, "{}", entry.message),
        }
        self.store.append_log(&entry).await
    }
}
