//! CSV-file-backed book repository
//!
//! Every operation loads the full book list from the CSV document; mutating
//! operations write the full list back, sorted by id. Nothing is cached between
//! calls and nothing is appended incrementally.
//!
//! # File Layout
//!
//! UTF-8 text with the header `Id,Title,Author,Year` and one row per book,
//! quoted according to `io::csv_format`. A missing or whitespace-only file is
//! an empty catalog; malformed rows are skipped on load.

use crate::io::csv_format::{deserialize_books, serialize_books};
use crate::io::file_store::{DiskFileStore, FileStore};
use crate::repository::traits::{ReadRepository, WriteRepository};
use crate::types::{Book, BookId, CatalogError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Book repository persisted as a CSV document
#[derive(Debug, Clone)]
pub struct CsvBookRepository<S: FileStore = DiskFileStore> {
    path: PathBuf,
    store: S,
}

impl CsvBookRepository {
    /// Create a repository backed by a CSV file on disk
    ///
    /// The file does not need to exist yet; it is created on the first write.
    ///
    /// # Returns
    ///
    /// * `Ok(CsvBookRepository)` for a non-blank path
    /// * `Err(CatalogError::InvalidPath)` if the path is empty or whitespace
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        Self::with_store(path, DiskFileStore)
    }
}

impl<S: FileStore> CsvBookRepository<S> {
    /// Create a repository reading and writing through `store`
    pub fn with_store(path: impl Into<PathBuf>, store: S) -> Result<Self, CatalogError> {
        let path = path.into();
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(CatalogError::invalid_path(&path.to_string_lossy()));
        }

        Ok(Self { path, store })
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    fn load(&self) -> Result<Vec<Book>, CatalogError> {
        if !self.store.exists(&self.path) {
            return Ok(Vec::new());
        }

        let content = self.store.read(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let books = deserialize_books(&content);
        debug!(path = %self.path.display(), count = books.len(), "Loaded books from CSV");
        Ok(books)
    }

    fn save(&self, books: &[Book]) -> Result<(), CatalogError> {
        let content = serialize_books(books)?;
        self.store.write(&self.path, &content)?;
        debug!(path = %self.path.display(), count = books.len(), "Saved books to CSV");
        Ok(())
    }
}

impl<S: FileStore> ReadRepository<Book, BookId> for CsvBookRepository<S> {
    fn get_by_id(&self, id: &BookId) -> Result<Option<Book>, CatalogError> {
        Ok(self.load()?.into_iter().find(|book| book.id == *id))
    }

    fn list_all(&self) -> Result<Vec<Book>, CatalogError> {
        self.load()
    }
}

impl<S: FileStore> WriteRepository<Book, BookId> for CsvBookRepository<S> {
    fn add(&mut self, entity: Book) -> Result<Book, CatalogError> {
        let mut books = self.load()?;

        // Upsert: drop any book with the same id, then insert
        books.retain(|book| book.id != entity.id);
        books.push(entity.clone());

        self.save(&books)?;
        Ok(entity)
    }

    fn update(&mut self, entity: Book) -> Result<bool, CatalogError> {
        let mut books = self.load()?;

        let Some(index) = books.iter().position(|book| book.id == entity.id) else {
            return Ok(false);
        };

        books[index] = entity;
        self.save(&books)?;
        Ok(true)
    }

    fn remove(&mut self, id: &BookId) -> Result<bool, CatalogError> {
        let mut books = self.load()?;
        let before = books.len();

        books.retain(|book| book.id != *id);
        let removed = books.len() < before;

        if removed {
            self.save(&books)?;
        }

        Ok(removed)
    }
}
