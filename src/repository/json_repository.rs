//! JSON-file-backed book repository
//!
//! Same snapshot model as the CSV repository: load everything at the start of
//! each operation, write everything back after a successful mutation. The
//! document keeps insertion order; an upsert moves the book to the end.
//!
//! Reading is fail-soft: a missing, blank or invalid document is an empty
//! catalog. The next successful write replaces an invalid document.

use crate::io::file_store::{DiskFileStore, FileStore};
use crate::io::json_format::{deserialize_books_json, serialize_books_json};
use crate::repository::traits::{ReadRepository, WriteRepository};
use crate::types::{Book, BookId, CatalogError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Book repository persisted as a pretty-printed JSON array
#[derive(Debug, Clone)]
pub struct JsonBookRepository<S: FileStore = DiskFileStore> {
    path: PathBuf,
    store: S,
}

impl JsonBookRepository {
    /// Create a repository backed by a JSON file on disk
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        Self::with_store(path, DiskFileStore)
    }
}

impl<S: FileStore> JsonBookRepository<S> {
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

        let books = deserialize_books_json(&self.store.read(&self.path)?);
        debug!(path = %self.path.display(), count = books.len(), "Loaded books from JSON");
        Ok(books)
    }

    fn save(&self, books: &[Book]) -> Result<(), CatalogError> {
        let json = serialize_books_json(books)?;
        self.store.write(&self.path, &json)?;
        debug!(path = %self.path.display(), count = books.len(), "Saved books to JSON");
        Ok(())
    }
}

impl<S: FileStore> ReadRepository<Book, BookId> for JsonBookRepository<S> {
    fn get_by_id(&self, id: &BookId) -> Result<Option<Book>, CatalogError> {
        Ok(self.load()?.into_iter().find(|book| book.id == *id))
    }

    fn list_all(&self) -> Result<Vec<Book>, CatalogError> {
        self.load()
    }
}

impl<S: FileStore> WriteRepository<Book, BookId> for JsonBookRepository<S> {
    fn add(&mut self, entity: Book) -> Result<Book, CatalogError> {
        let mut books = self.load()?;
        books.retain(|book| book.id != entity.id);
        books.push(entity.clone());
        self.save(&books)?;
        Ok(entity)
    }

    fn update(&mut self, entity: Book) -> Result<bool, CatalogError> {
        let mut books = self.load()?;

        match books.iter_mut().find(|book| book.id == entity.id) {
            Some(slot) => *slot = entity,
            None => return Ok(false),
        }

        self.save(&books)?;
        Ok(true)
    }

    fn remove(&mut self, id: &BookId) -> Result<bool, CatalogError> {
        let mut books = self.load()?;
        let before = books.len();

        books.retain(|book| book.id != *id);
        if books.len() == before {
            return Ok(false);
        }

        self.save(&books)?;
        Ok(true)
    }
}
