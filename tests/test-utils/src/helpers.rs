//! Test helper functions and utilities

use anyhow::Result;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing_subscriber::EnvFilter;

/// Route tracing output to the test harness; later calls are ignored
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Poll `condition` until it holds or `limit` elapses.
///
/// Works under paused time: each poll advances the clock by `poll`.
pub async fn wait_for<F>(condition: F, limit: Duration, poll: Duration) -> Result<()>
where
    F: Fn() -> bool,
{
    timeout(limit, async {
        while !condition() {
            sleep(poll).await;
        }
    })
    .await
    .map_err(|_| anyhow::anyhow!("Timeout waiting for condition after {limit:?}"))
}
