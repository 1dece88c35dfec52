use crate::foundation::{RoundError, LEDGER_POLL_INTERVAL_SECS, LEDGER_POLL_TIMEOUT_SECS};
use log::{debug, warn};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Bounded fixed-interval polling window for ledger lookups.
#[derive(Clone, Copy, Debug)]
pub struct PollConfig {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(LEDGER_POLL_TIMEOUT_SECS), interval: Duration::from_secs(LEDGER_POLL_INTERVAL_SECS) }
    }
}

/// Polls `op` until it yields a value or the window closes.
///
/// `Ok(None)` after the window means the target never appeared (a definitive
/// not-found for the caller to classify). Transport errors are retried like
/// misses; if the final attempt also errored the last error is surfaced as
/// `LedgerUnavailable` so callers can distinguish "absent" from "endpoint
/// down".
pub async fn poll_until<F, Fut, T>(operation: &str, config: PollConfig, mut op: F) -> Result<Option<T>, RoundError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, RoundError>>,
{
    let mut waited = Duration::ZERO;
    let mut attempt = 0usize;
    // Assigned on every pass; the loop body runs at least once before break.
    let mut last_err: Option<RoundError>;
    loop {
        attempt += 1;
        last_err = match op().await {
            Ok(Some(value)) => {
                debug!("ledger poll resolved operation={} attempt={}", operation, attempt);
                return Ok(Some(value));
            }
            Ok(None) => None,
            Err(err) => {
                warn!("ledger poll attempt failed operation={} attempt={} error={}", operation, attempt, err);
                Some(err)
            }
        };
        if waited >= config.timeout {
            break;
        }
        sleep(config.interval).await;
        waited += config.interval;
    }
    match last_err {
        Some(err) => Err(RoundError::LedgerUnavailable { operation: operation.to_string(), details: err.to_string() }),
        None => Ok(None),
    }
}
