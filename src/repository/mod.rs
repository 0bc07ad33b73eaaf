//! Repository module
//!
//! This module defines the generic keyed-store contract and its interchangeable
//! backends, plus a factory that selects a backend at runtime.
//!
//! - `traits` - `ReadRepository`, `WriteRepository` and the combined `Repository`
//! - `in_memory` - Map-backed repository with a caller-supplied id function
//! - `csv_repository` - Book repository persisted as CSV
//! - `json_repository` - Book repository persisted as JSON

use crate::cli::StoreKind;
use crate::types::{Book, BookId, CatalogError};
use std::path::Path;

pub mod csv_repository;
pub mod in_memory;
pub mod json_repository;
pub mod traits;

pub use csv_repository::CsvBookRepository;
pub use in_memory::InMemoryRepository;
pub use json_repository::JsonBookRepository;
pub use traits::{ReadRepository, Repository, WriteRepository};

/// A book repository chosen at runtime
pub type BoxedBookRepository = Box<dyn Repository<Book, BookId> + Send>;

/// Create a book repository based on the specified store kind
///
/// # Arguments
///
/// * `kind` - Backend to use
/// * `path` - Backing file for CSV and JSON stores (ignored for memory)
///
/// # Returns
///
/// A boxed repository, or `CatalogError::InvalidPath` for a blank path on a
/// file-backed store.
pub fn create_repository(kind: StoreKind, path: &Path) -> Result<BoxedBookRepository, CatalogError> {
    let repo: BoxedBookRepository = match kind {
        StoreKind::Memory => Box::new(InMemoryRepository::new(|book: &Book| book.id)),
        StoreKind::Csv => Box::new(CsvBookRepository::new(path)?),
        StoreKind::Json => Box::new(JsonBookRepository::new(path)?),
    };

    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    #[case::memory(StoreKind::Memory)]
    #[case::csv(StoreKind::Csv)]
    #[case::json(StoreKind::Json)]
    fn test_create_repository_backends_are_interchangeable(#[case] kind: StoreKind) {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut repo = create_repository(kind, &dir.path().join("books.store")).unwrap();

        repo.add(Book::new(1, "A", "X", 2020)).unwrap();
        assert_eq!(repo.get_by_id(&1).unwrap(), Some(Book::new(1, "A", "X", 2020)));
        assert!(repo.update(Book::new(1, "A2", "X", 2020)).unwrap());
        assert!(repo.remove(&1).unwrap());
        assert!(repo.list_all().unwrap().is_empty());
    }

    #[rstest]
    #[case::csv(StoreKind::Csv)]
    #[case::json(StoreKind::Json)]
    fn test_create_repository_rejects_blank_path(#[case] kind: StoreKind) {
        assert!(create_repository(kind, Path::new("")).is_err());
    }

    #[test]
    fn test_memory_store_ignores_path() {
        assert!(create_repository(StoreKind::Memory, Path::new("")).is_ok());
    }
}
