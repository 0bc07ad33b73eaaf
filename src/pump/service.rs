//! Retrying pump from an item source into an item sink
//!
//! # Item Lifecycle
//!
//! ```text
//! Idle ──▶ Writing ──▶ Success ──▶ (next item)
//!             │
//!             ▼
//!          Failure ──(attempt <= max_retries)──▶ Backoff ──▶ Writing
//!             │
//!             └──(attempt > max_retries)──▶ RetriesExhausted
//! ```
//!
//! Items are written strictly one at a time and in source order. Cancellation
//! wins over every other outcome: it is checked while waiting for the next
//! item, before each write attempt and during the backoff delay, and it is
//! never retried. Items already written stay written when a run aborts.

use crate::pump::traits::{BackoffPolicy, Clock, Delay, ItemSink, ItemSource};
use crate::types::{PumpError, WriteError};
use futures::StreamExt;
use std::sync::Arc;
use std::time::SystemTime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Retry configuration for a pump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpConfig {
    /// Retries allowed per item after its first failed write
    pub max_retries: u32,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}

/// Moves items from a source to a sink with bounded, backed-off retries
///
/// # Collaborators
///
/// All collaborators are shared trait objects so a test can keep a handle on
/// the same double it hands to the pump.
pub struct PumpService<T: Send + Sync> {
    source: Arc<dyn ItemSource<T>>,
    sink: Arc<dyn ItemSink<T>>,
    clock: Arc<dyn Clock>,
    delay: Arc<dyn Delay>,
    backoff: Arc<dyn BackoffPolicy>,
    config: PumpConfig,
}

impl<T: Send + Sync> PumpService<T> {
    /// Create a new pump
    ///
    /// # Arguments
    ///
    /// * `source` - Items to move
    /// * `sink` - Destination of every item
    /// * `clock` - Time source read when scheduling a retry
    /// * `delay` - Cancellable wait used between attempts
    /// * `backoff` - Delay for each retry attempt
    /// * `config` - Retry bound
    pub fn new(
        source: Arc<dyn ItemSource<T>>,
        sink: Arc<dyn ItemSink<T>>,
        clock: Arc<dyn Clock>,
        delay: Arc<dyn Delay>,
        backoff: Arc<dyn BackoffPolicy>,
        config: PumpConfig,
    ) -> Self {
        Self {
            source,
            sink,
            clock,
            delay,
            backoff,
            config,
        }
    }

    /// Retry configuration of this pump
    pub fn config(&self) -> &PumpConfig {
        &self.config
    }

    /// Pump every item from the source into the sink
    ///
    /// # Arguments
    ///
    /// * `cancel` - Token observed at every suspension point
    ///
    /// # Returns
    ///
    /// * `Ok(count)` with the number of items written once the source ends
    /// * `Err(PumpError::Cancelled)` if cancellation was requested
    /// * `Err(PumpError::Source)` if the source yielded an error
    /// * `Err(PumpError::RetriesExhausted)` if an item kept failing
    pub async fn run(&self, cancel: &CancellationToken) -> Result<usize, PumpError> {
        let mut items = self.source.read(cancel.clone());
        let mut written = 0usize;

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PumpError::Cancelled),
                next = items.next() => next,
            };

            let item = match next {
                Some(Ok(item)) => item,
                Some(Err(source)) => {
                    warn!(written, error = %source, "Source failed, aborting pump run");
                    return Err(PumpError::Source { written, source });
                }
                None => break,
            };

            self.write_with_retry(&item, cancel).await?;
            written += 1;
            debug!(written, "Item written");
        }

        info!(written, "Pump run completed");
        Ok(written)
    }

    async fn write_with_retry(&self, item: &T, cancel: &CancellationToken) -> Result<(), PumpError> {
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(PumpError::Cancelled);
            }

            let source = match self.sink.write(item, cancel).await {
                Ok(()) => return Ok(()),
                Err(WriteError::Cancelled) => return Err(PumpError::Cancelled),
                Err(WriteError::Failed(source)) => source,
            };

            attempt += 1;
            if attempt > self.config.max_retries {
                warn!(attempts = attempt, error = %source, "Write retries exhausted");
                return Err(PumpError::RetriesExhausted {
                    attempts: attempt,
                    source,
                });
            }

            let wait = self.backoff.delay_for(attempt);
            let delay_ms = wait.as_millis() as u64;
            let now = self.clock.now();
            warn!(
                attempt,
                max_retries = self.config.max_retries,
                delay_ms,
                retry_at_ms = millis_since_epoch(now).saturating_add(delay_ms),
                error = %source,
                "Write failed, retrying"
            );

            if !wait.is_zero() {
                self.delay.delay(wait, cancel).await?;
            }
        }
    }
}

fn millis_since_epoch(time: SystemTime) -> u64 {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
