//! JSON format handling for book records
//!
//! Books are stored as a pretty-printed array of camelCase objects. Reading is
//! fail-soft: blank or invalid content yields an empty list instead of an error.

use crate::types::{Book, CatalogError};
use tracing::warn;

/// Serialize books to a pretty-printed JSON array, preserving order
pub fn serialize_books_json(books: &[Book]) -> Result<String, CatalogError> {
    Ok(serde_json::to_string_pretty(books)?)
}

/// Deserialize books from JSON text
///
/// Blank text, `null` and invalid JSON all yield an empty list.
pub fn deserialize_books_json(text: &str) -> Vec<Book> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Option<Vec<Book>>>(text) {
        Ok(books) => books.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "Invalid JSON book document, treating as empty");
            Vec::new()
        }
    }
}
