//! Backoff policies
//!
//! Pure functions of the attempt number: no jitter, no state. Both policies
//! return zero for attempt 0 and never exceed their `max`.

use crate::cli::BackoffKind;
use crate::pump::traits::BackoffPolicy;
use std::time::Duration;

/// `min(base * 2^(attempt - 1), max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    /// Delay before the first retry
    pub base: Duration,
    /// Upper bound for any delay
    pub max: Duration,
}

impl ExponentialBackoff {
    /// Create an exponential policy
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { base, max }
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(50), Duration::from_secs(2))
    }
}

impl BackoffPolicy for ExponentialBackoff {
    fn delay_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        // Saturate instead of overflowing for large attempt numbers
        let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        self.base
            .checked_mul(factor)
            .map_or(self.max, |delay| delay.min(self.max))
    }
}

/// `min(step * attempt, max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearBackoff {
    /// Delay added per attempt
    pub step: Duration,
    /// Upper bound for any delay
    pub max: Duration,
}

impl LinearBackoff {
    /// Create a linear policy
    pub fn new(step: Duration, max: Duration) -> Self {
        Self { step, max }
    }
}

impl Default for LinearBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(50), Duration::from_secs(1))
    }
}

impl BackoffPolicy for LinearBackoff {
    fn delay_for(&self, attempt: u32) -> Duration {
        self.step
            .checked_mul(attempt)
            .map_or(self.max, |delay| delay.min(self.max))
    }
}

/// Create a backoff policy based on the specified kind
///
/// # Arguments
///
/// * `kind` - Growth curve of the delays
/// * `step` - Base delay (exponential) or per-attempt increment (linear)
/// * `max` - Upper bound for any delay
///
/// # Returns
///
/// A boxed policy that can be shared with the pump
pub fn create_backoff_policy(
    kind: BackoffKind,
    step: Duration,
    max: Duration,
) -> Box<dyn BackoffPolicy> {
    match kind {
        BackoffKind::Exponential => Box::new(ExponentialBackoff::new(step, max)),
        BackoffKind::Linear => Box::new(LinearBackoff::new(step, max)),
    }
}
