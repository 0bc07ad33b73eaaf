//! Deterministic collaborators for exercising a pump
//!
//! None of these touch real time or real storage. `FakeDelay` moves a
//! `FakeClock` forward instead of sleeping, so a run with several backoffs
//! completes immediately and the requested delays can be asserted afterwards.

use crate::pump::traits::{Clock, Delay, ItemSink, ItemSource};
use crate::types::{BoxError, PumpError, WriteError};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};
use tokio_util::sync::CancellationToken;

/// Manually driven clock starting at the Unix epoch
///
/// Every `now()` returns the current value and then advances by `tick`, so two
/// consecutive reads are always distinct.
#[derive(Debug)]
pub struct FakeClock {
    now: Mutex<SystemTime>,
    tick: Duration,
}

impl FakeClock {
    /// Clock advancing 10 ms per read
    pub fn new() -> Self {
        Self::with_tick(Duration::from_millis(10))
    }

    /// Clock advancing `tick` per read
    pub fn with_tick(tick: Duration) -> Self {
        Self {
            now: Mutex::new(SystemTime::UNIX_EPOCH),
            tick,
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    /// Current value without advancing
    pub fn peek(&self) -> SystemTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> SystemTime {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        let current = *now;
        *now += self.tick;
        current
    }
}

/// Delay that advances a [`FakeClock`] and records what was requested
#[derive(Debug)]
pub struct FakeDelay {
    clock: Arc<FakeClock>,
    requested: Mutex<Vec<Duration>>,
}

impl FakeDelay {
    /// Create a delay driving `clock`
    pub fn new(clock: Arc<FakeClock>) -> Self {
        Self {
            clock,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Every duration requested so far, in order
    pub fn requested(&self) -> Vec<Duration> {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Delay for FakeDelay {
    async fn delay(&self, duration: Duration, cancel: &CancellationToken) -> Result<(), PumpError> {
        if cancel.is_cancelled() {
            return Err(PumpError::Cancelled);
        }

        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
        self.clock.advance(duration);
        tokio::task::yield_now().await;
        Ok(())
    }
}

/// Source yielding a fixed list, optionally failing at an index
#[derive(Debug, Clone)]
pub struct VecSource<T> {
    items: Vec<T>,
    fail_at: Option<usize>,
}

impl<T> VecSource<T> {
    /// Source yielding every item
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            fail_at: None,
        }
    }

    /// Source yielding the items before `index`, then an error
    pub fn failing_at(items: Vec<T>, index: usize) -> Self {
        Self {
            items,
            fail_at: Some(index),
        }
    }
}

impl<T: Clone + Send + Sync> ItemSource<T> for VecSource<T> {
    fn read(&self, _cancel: CancellationToken) -> BoxStream<'_, Result<T, BoxError>> {
        let end = self.fail_at.unwrap_or(self.items.len()).min(self.items.len());
        let items = self.items[..end].iter().cloned().map(Ok);
        let failure = self
            .fail_at
            .map(|index| Err(BoxError::from(format!("source failed at item {}", index))));

        stream::iter(items.chain(failure)).boxed()
    }
}

type WriteHook = Box<dyn Fn() + Send + Sync>;

/// Sink that records successful writes and can fail on demand
///
/// A write proceeds as: count the attempt, run the start hook, observe
/// cancellation, consume a scheduled failure, store the item, run the
/// completion hook.
pub struct RecordingSink<T> {
    written: Mutex<Vec<T>>,
    attempts: AtomicUsize,
    failures_left: AtomicUsize,
    on_start: Option<WriteHook>,
    on_complete: Option<WriteHook>,
}

impl<T> RecordingSink<T> {
    /// Sink accepting every write
    pub fn new() -> Self {
        Self::failing_first(0)
    }

    /// Sink failing its first `failures` write attempts
    pub fn failing_first(failures: usize) -> Self {
        Self {
            written: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            failures_left: AtomicUsize::new(failures),
            on_start: None,
            on_complete: None,
        }
    }

    /// Run `hook` at the start of every write attempt
    pub fn on_write_started(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_start = Some(Box::new(hook));
        self
    }

    /// Run `hook` after every successful write
    pub fn on_write_completed(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Box::new(hook));
        self
    }

    /// Number of write attempts, successful or not
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn fail_next(&self) -> bool {
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
    }
}

impl<T: Clone> RecordingSink<T> {
    /// Items written successfully, in order
    pub fn written(&self) -> Vec<T> {
        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T> Default for RecordingSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> ItemSink<T> for RecordingSink<T> {
    async fn write(&self, item: &T, cancel: &CancellationToken) -> Result<(), WriteError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(hook) = &self.on_start {
            hook();
        }

        if cancel.is_cancelled() {
            return Err(WriteError::Cancelled);
        }

        if self.fail_next() {
            return Err(WriteError::failed(format!(
                "simulated write failure on attempt {}",
                attempt
            )));
        }

        tokio::task::yield_now().await;
        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(item.clone());

        if let Some(hook) = &self.on_complete {
            hook();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    #[test]
    fn test_fake_clock_ticks_on_read() {
        let clock = FakeClock::with_tick(Duration::from_millis(5));

        let first = clock.now();
        let second = clock.now();

        assert_eq!(first, SystemTime::UNIX_EPOCH);
        assert_eq!(second, SystemTime::UNIX_EPOCH + Duration::from_millis(5));
        assert_eq!(clock.peek(), SystemTime::UNIX_EPOCH + Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_fake_delay_advances_clock_and_records() {
        let clock = Arc::new(FakeClock::new());
        let delay = FakeDelay::new(clock.clone());
        let cancel = CancellationToken::new();

        delay.delay(Duration::from_secs(3), &cancel).await.unwrap();
        delay.delay(Duration::from_secs(1), &cancel).await.unwrap();

        assert_eq!(clock.peek(), SystemTime::UNIX_EPOCH + Duration::from_secs(4));
        assert_eq!(
            delay.requested(),
            vec![Duration::from_secs(3), Duration::from_secs(1)]
        );
    }

    #[tokio::test]
    async fn test_fake_delay_honours_cancellation() {
        let clock = Arc::new(FakeClock::new());
        let delay = FakeDelay::new(clock.clone());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = delay.delay(Duration::from_secs(3), &cancel).await;

        assert!(matches!(result, Err(PumpError::Cancelled)));
        assert_eq!(clock.peek(), SystemTime::UNIX_EPOCH);
    }

    #[tokio::test]
    async fn test_vec_source_failure_ends_stream() {
        let source = VecSource::failing_at(vec!["a", "b", "c"], 2);
        let items: Vec<Result<&str, BoxError>> =
            source.read(CancellationToken::new()).collect().await;

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap(), &"a");
        assert_eq!(items[1].as_ref().unwrap(), &"b");
        assert!(items[2].is_err());
    }

    #[tokio::test]
    async fn test_vec_source_yields_everything() {
        let source = VecSource::new(vec![1, 2, 3]);
        let items: Vec<i32> = source
            .read(CancellationToken::new())
            .try_collect()
            .await
            .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_recording_sink_fails_then_records() {
        let sink = RecordingSink::failing_first(1);
        let cancel = CancellationToken::new();

        assert!(matches!(
            sink.write(&"x", &cancel).await,
            Err(WriteError::Failed(_))
        ));
        assert!(sink.write(&"x", &cancel).await.is_ok());

        assert_eq!(sink.attempts(), 2);
        assert_eq!(sink.written(), vec!["x"]);
    }
}
