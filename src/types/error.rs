//! Error types for the book catalog
//!
//! This module defines all error types that can occur while persisting books,
//! applying catalog rules and pumping items from a source into a sink.
//!
//! # Error Categories
//!
//! - **Storage Errors**: invalid repository path, I/O failures, codec failures
//! - **Validation Errors**: bad input to the catalog service, never retried
//! - **Pump Errors**: cancellation, source failure, exhausted write retries
//!
//! Not-found conditions are not errors: repositories signal them with
//! `Option`/`bool` return values.

use thiserror::Error;

/// Boxed error used at the pump's collaborator seams
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for repositories and the catalog service
///
/// Each variant carries owned, printable context so the error can be cloned,
/// compared in tests and shown directly on the CLI.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// Repository path is empty or whitespace
    #[error("Invalid repository path: '{path}'")]
    InvalidPath {
        /// The rejected path
        path: String,
    },

    /// I/O error occurred while reading or writing the backing file
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV encoding or decoding failed at the transport level
    ///
    /// Malformed rows are not reported this way: they are skipped.
    #[error("CSV error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the error
        message: String,
    },

    /// JSON encoding failed
    ///
    /// Invalid JSON on read is fail-soft and never produces this error.
    #[error("JSON error: {message}")]
    JsonError {
        /// Description of the serializer error
        message: String,
    },

    /// A book failed a business rule
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: String,
        /// Human-readable rule that was violated
        message: String,
    },

    /// A book with this id is already registered
    #[error("Book with id {id} already exists")]
    DuplicateBook {
        /// The duplicated id
        id: i32,
    },
}

impl From<std::io::Error> for CatalogError {
    fn from(error: std::io::Error) -> Self {
        CatalogError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for CatalogError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        CatalogError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(error: serde_json::Error) -> Self {
        CatalogError::JsonError {
            message: error.to_string(),
        }
    }
}

impl CatalogError {
    /// Create a Validation error
    pub fn validation(field: &str, message: &str) -> Self {
        CatalogError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Create an InvalidPath error
    pub fn invalid_path(path: &str) -> Self {
        CatalogError::InvalidPath {
            path: path.to_string(),
        }
    }

    /// Create a DuplicateBook error
    pub fn duplicate_book(id: i32) -> Self {
        CatalogError::DuplicateBook { id }
    }

    /// Whether this error was produced by a business rule rather than storage
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CatalogError::Validation { .. } | CatalogError::DuplicateBook { .. }
        )
    }
}

/// Result of a single sink write
///
/// The pump retries `Failed` writes and aborts immediately on `Cancelled`.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The sink observed a cancellation request
    #[error("Write cancelled")]
    Cancelled,

    /// The write failed and may succeed if retried
    #[error("Write failed: {0}")]
    Failed(#[source] BoxError),
}

impl WriteError {
    /// Wrap any error as a retryable write failure
    pub fn failed(error: impl Into<BoxError>) -> Self {
        WriteError::Failed(error.into())
    }
}

/// Error returned by a pump run
#[derive(Debug, Error)]
pub enum PumpError {
    /// The run was cancelled; never retried
    #[error("Pump run cancelled")]
    Cancelled,

    /// The source failed; items already written stay written
    #[error("Source failed after {written} item(s) written: {source}")]
    Source {
        /// Items successfully written before the failure
        written: usize,
        /// The source's error
        #[source]
        source: BoxError,
    },

    /// A write kept failing past the configured retry bound
    #[error("Write failed after {attempts} attempt(s): {source}")]
    RetriesExhausted {
        /// Total write attempts made for the failing item
        attempts: u32,
        /// The last write error
        #[source]
        source: BoxError,
    },
}

impl PumpError {
    /// Whether the run stopped because of cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PumpError::Cancelled)
    }
}
