//! Production clock and delay backed by the system time and the tokio timer

use crate::pump::traits::{Clock, Delay};
use crate::types::PumpError;
use async_trait::async_trait;
use std::time::{Duration, SystemTime};
use tokio_util::sync::CancellationToken;

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Sleeps on the tokio timer, woken early by cancellation
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn delay(&self, duration: Duration, cancel: &CancellationToken) -> Result<(), PumpError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PumpError::Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}
