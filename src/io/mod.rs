//! I/O module
//!
//! Handles document formats and storage access.
//!
//! # Components
//!
//! - `csv_format` - CSV document serialization and tolerant parsing
//! - `json_format` - JSON document serialization and fail-soft parsing
//! - `file_store` - Whole-document storage (disk or in-memory)
//! - `async_reader` - Asynchronous CSV reader with stream interface

pub mod async_reader;
pub mod csv_format;
pub mod file_store;
pub mod json_format;

pub use async_reader::AsyncBookReader;
pub use csv_format::{deserialize_books, escape_field, serialize_books, unescape_field, CSV_HEADER};
pub use file_store::{DiskFileStore, FileStore, InMemoryFileStore};
pub use json_format::{deserialize_books_json, serialize_books_json};
