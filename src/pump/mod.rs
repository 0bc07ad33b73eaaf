//! Pump module
//!
//! Moves items from a source to a sink one at a time, retrying failed writes
//! with a backoff policy and honouring cooperative cancellation.
//!
//! # Architecture
//!
//! ```text
//! ItemSource ──▶ PumpService ──▶ ItemSink
//!                   │   ▲
//!      BackoffPolicy┘   └┬ Clock
//!                        └ Delay
//! ```
//!
//! - `traits` - Collaborator seams
//! - `service` - `PumpService` and `PumpConfig`
//! - `backoff` - Exponential and linear backoff policies
//! - `runtime` - System clock and tokio-timer delay
//! - `adapters` - CSV file source and repository sink for books
//! - `doubles` - Deterministic clock, delay, source and sink (tests only)

pub mod adapters;
pub mod backoff;
#[cfg(test)]
pub mod doubles;
pub mod runtime;
pub mod service;
pub mod traits;

pub use adapters::{CsvBookSource, RepositorySink};
pub use backoff::{create_backoff_policy, ExponentialBackoff, LinearBackoff};
pub use runtime::{SystemClock, TokioDelay};
pub use service::{PumpConfig, PumpService};
pub use traits::{BackoffPolicy, Clock, Delay, ItemSink, ItemSource};
