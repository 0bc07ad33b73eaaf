//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `book`: The catalog entity and its identifier
//! - `error`: Error types for repositories, the catalog service and the pump

pub mod book;
pub mod error;

pub use book::{Book, BookId};
pub use error::{BoxError, CatalogError, PumpError, WriteError};
