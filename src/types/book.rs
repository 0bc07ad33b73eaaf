//! Book-related types for the catalog
//!
//! This module defines the catalog entity and its identifier type, shared by
//! every repository backend, the codecs and the catalog service.

use serde::{Deserialize, Serialize};

/// Book identifier
///
/// Identifiers come from the entity itself; repositories never generate them.
pub type BookId = i32;

/// A book in the catalog
///
/// Immutable value type: equality is by value and "modifications" produce a new
/// `Book` (see [`Book::with_title`]). Serialized with camelCase keys
/// (`id`, `title`, `author`, `year`). Missing properties fall back to their
/// defaults so that a single sparse entry does not invalidate a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Book {
    /// Unique identifier within a repository
    pub id: BookId,

    /// Title, may contain commas, quotes and line breaks
    pub title: String,

    /// Author, may contain commas, quotes and line breaks
    pub author: String,

    /// Publication year (0 when unknown in persisted data)
    pub year: i32,
}

impl Book {
    /// Create a new book
    pub fn new(id: BookId, title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            year,
        }
    }

    /// Copy of this book with a different title
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }
}
