//! Rust Book Catalog Library
//! # Overview
//!
//! This library provides a small book catalog behind a generic repository
//! contract, with interchangeable in-memory, CSV and JSON backends, and a
//! retrying pump that streams items from a source into a sink.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Book, error enums)
//! - [`cli`] - CLI arguments parsing
//! - [`io`] - Document codecs and storage access:
//!   - [`io::csv_format`] - CSV serialization with RFC-4180 quoting and tolerant parsing
//!   - [`io::json_format`] - JSON serialization with fail-soft parsing
//!   - [`io::file_store`] - Whole-document storage on disk or in memory
//!   - [`io::async_reader`] - Streaming CSV reader
//! - [`repository`] - Read/write repository traits and their backends
//! - [`service`] - Catalog business rules over any repository
//! - [`pump`] - Source-to-sink pump with backoff, retries and cancellation
//!
//! # Persistence Model
//!
//! File-backed repositories keep no state between calls: each operation loads
//! the whole document, and each successful mutation rewrites it. Two
//! repositories pointed at the same file therefore always see each other's
//! writes.
//!
//! # Pump Outcomes
//!
//! A pump run ends in exactly one of:
//! - the number of items written, once the source is exhausted
//! - `Cancelled`, as soon as cancellation is observed
//! - `Source`, when the source yields an error
//! - `RetriesExhausted`, when one item keeps failing past the retry bound

// Module declarations
pub mod cli;
pub mod io;
pub mod pump;
pub mod repository;
pub mod service;
pub mod types;

pub use io::{deserialize_books, escape_field, serialize_books, unescape_field};
pub use repository::{
    create_repository, BoxedBookRepository, CsvBookRepository, InMemoryRepository,
    JsonBookRepository, ReadRepository, Repository, WriteRepository,
};
pub use service::CatalogService;
pub use types::{Book, BookId, BoxError, CatalogError, PumpError, WriteError};
