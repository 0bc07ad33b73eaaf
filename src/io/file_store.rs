//! File store abstraction
//!
//! File-backed repositories read and write whole documents through a
//! [`FileStore`], so the same repository code can run against the real file
//! system or against an in-memory map in tests.

use crate::types::CatalogError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Whole-document storage keyed by path
pub trait FileStore: Send + Sync {
    /// Whether a document exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read the full document at `path` as UTF-8 text
    fn read(&self, path: &Path) -> Result<String, CatalogError>;

    /// Replace the document at `path` with `contents`
    ///
    /// Plain overwrite: a crash mid-write may leave a truncated file.
    fn write(&self, path: &Path, contents: &str) -> Result<(), CatalogError>;
}

/// File store backed by the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileStore;

impl FileStore for DiskFileStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> Result<String, CatalogError> {
        fs::read_to_string(path).map_err(|e| CatalogError::IoError {
            message: format!("Failed to read '{}': {}", path.display(), e),
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), CatalogError> {
        fs::write(path, contents).map_err(|e| CatalogError::IoError {
            message: format!("Failed to write '{}': {}", path.display(), e),
        })
    }
}

/// File store kept entirely in memory
///
/// Counts writes so tests can assert that read-only or no-op operations never
/// persist anything.
#[derive(Debug, Default)]
pub struct InMemoryFileStore {
    files: Mutex<HashMap<PathBuf, String>>,
    writes: AtomicUsize,
}

impl InMemoryFileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one document, without counting it as a write
    pub fn with_file(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let store = Self::new();
        store.files().insert(path.into(), contents.into());
        store
    }

    /// Number of completed writes
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current contents of the document at `path`
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files().get(path).cloned()
    }

    fn files(&self) -> MutexGuard<'_, HashMap<PathBuf, String>> {
        // A panic while holding the lock cannot leave a half-written entry
        self.files
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FileStore for InMemoryFileStore {
    fn exists(&self, path: &Path) -> bool {
        self.files().contains_key(path)
    }

    fn read(&self, path: &Path) -> Result<String, CatalogError> {
        Ok(self.files().get(path).cloned().unwrap_or_default())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), CatalogError> {
        self.files().insert(path.to_path_buf(), contents.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl<S: FileStore + ?Sized> FileStore for std::sync::Arc<S> {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read(&self, path: &Path) -> Result<String, CatalogError> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), CatalogError> {
        (**self).write(path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_disk_store_round_trip() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("books.csv");
        let store = DiskFileStore;

        assert!(!store.exists(&path));
        store.write(&path, "Id,Title,Author,Year\n").unwrap();
        assert!(store.exists(&path));
        assert_eq!(store.read(&path).unwrap(), "Id,Title,Author,Year\n");
    }

    #[test]
    fn test_disk_store_read_missing_file_fails() {
        let dir = tempdir().expect("Failed to create temp dir");
        let result = DiskFileStore.read(&dir.path().join("missing.json"));

        assert!(matches!(result, Err(CatalogError::IoError { .. })));
        assert!(result.unwrap_err().to_string().contains("Failed to read"));
    }

    #[test]
    fn test_disk_store_write_into_missing_directory_fails() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("no-such-dir").join("books.csv");

        assert!(DiskFileStore.write(&path, "x").is_err());
    }

    #[test]
    fn test_in_memory_store_counts_writes() {
        let store = InMemoryFileStore::new();
        let path = Path::new("books.json");

        assert!(!store.exists(path));
        assert_eq!(store.read(path).unwrap(), "");

        store.write(path, "[]").unwrap();
        store.write(path, "[ ]").unwrap();

        assert!(store.exists(path));
        assert_eq!(store.contents(path).as_deref(), Some("[ ]"));
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_in_memory_store_seeded_file_is_not_a_write() {
        let store = InMemoryFileStore::with_file("seed.csv", "1,A,B,2000\n");

        assert!(store.exists(Path::new("seed.csv")));
        assert_eq!(store.write_count(), 0);
    }
}
