//! Pump collaborator traits
//!
//! The pump owns no I/O of its own: items come from an [`ItemSource`], go to an
//! [`ItemSink`], and waiting between attempts goes through [`Clock`], [`Delay`]
//! and [`BackoffPolicy`]. Tests swap every one of them for a deterministic
//! double.

use crate::types::{BoxError, PumpError, WriteError};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::time::{Duration, SystemTime};
use tokio_util::sync::CancellationToken;

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> SystemTime;
}

/// Cancellable wait
#[async_trait]
pub trait Delay: Send + Sync {
    /// Wait for `duration` unless `cancel` fires first
    ///
    /// # Returns
    ///
    /// * `Ok(())` once the duration elapsed
    /// * `Err(PumpError::Cancelled)` if cancellation was requested before or
    ///   during the wait
    async fn delay(&self, duration: Duration, cancel: &CancellationToken) -> Result<(), PumpError>;
}

/// Lazy, finite sequence of items
///
/// A stream is consumed once; calling `read` again is not expected to restart
/// it. An `Err` item aborts the pump run.
pub trait ItemSource<T>: Send + Sync {
    /// Open the item stream
    fn read(&self, cancel: CancellationToken) -> BoxStream<'_, Result<T, BoxError>>;
}

/// Destination for items, written one at a time
#[async_trait]
pub trait ItemSink<T: Send + Sync>: Send + Sync {
    /// Write a single item
    ///
    /// Return `WriteError::Failed` for failures the pump should retry and
    /// `WriteError::Cancelled` when `cancel` has been observed.
    async fn write(&self, item: &T, cancel: &CancellationToken) -> Result<(), WriteError>;
}

/// Maps a retry attempt number to the wait before that attempt
pub trait BackoffPolicy: Send + Sync {
    /// Delay before retry number `attempt` (1-based); attempt 0 means no wait
    fn delay_for(&self, attempt: u32) -> Duration;
}
