//! Non-throwing boundary around the advisory oracle
//!
//! Every oracle failure (transport, timeout, malformed body, schema
//! violation, even a panic inside the oracle) ends here and becomes the
//! deterministic fallback. Nothing past this module sees an `AdvisoryError`.

use services_common::{
    AdvisoryContext, AdvisoryError, AdvisoryOracle, AdvisoryVerdict, SentimentReport,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct SignalAdvisor {
    oracle: Arc<dyn AdvisoryOracle>,
    timeout: Duration,
}

impl SignalAdvisor {
    pub fn new(oracle: Arc<dyn AdvisoryOracle>, timeout: Duration) -> Self {
        Self { oracle, timeout }
    }

    /// Recommendation for the given market context; HOLD/0 on any failure
    pub async fn analyze(&self, context: &AdvisoryContext) -> AdvisoryVerdict {
        let oracle = Arc::clone(&self.oracle);
        let context = context.clone();
        let result = self
            .guarded(async move { oracle.recommend(&context).await })
            .await
            .and_then(AdvisoryVerdict::try_from);

        match result {
            Ok(verdict) => {
                debug!(
                    signal = %verdict.signal_type,
                    confidence = verdict.confidence,
                    "Advisory verdict received"
                );
                verdict
            }
            Err(e) => {
                warn!(error = %e, "Advisory oracle failed, using fallback verdict");
                AdvisoryVerdict::fallback()
            }
        }
    }

    /// Sentiment for `symbol`; NEUTRAL/0 on any failure
    pub async fn sentiment(&self, symbol: &str, news: Option<&[String]>) -> SentimentReport {
        let oracle = Arc::clone(&self.oracle);
        let symbol = symbol.to_string();
        let news = news.map(<[String]>::to_vec);
        let result = self
            .guarded(async move { oracle.sentiment(&symbol, news.as_deref()).await })
            .await
            .and_then(SentimentReport::try_from);

        result.unwrap_or_else(|e| {
            warn!(error = %e, "Sentiment oracle failed, using fallback report");
            SentimentReport::fallback()
        })
    }

    /// Run an oracle call on its own task under the advisory deadline
    async fn guarded<T, F>(&self, call: F) -> Result<T, AdvisoryError>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, AdvisoryError>> + Send + 'static,
    {
        let mut handle = tokio::spawn(call);
        match tokio::time::timeout(self.timeout, &mut handle).await {
            Ok(joined) => {
                joined.map_err(|e| AdvisoryError::Transport(format!("oracle task failed: {e}")))?
            }
            Err(_) => {
                handle.abort();
                Err(AdvisoryError::Timeout(self.timeout.as_secs()))
            }
        }
    }
}
