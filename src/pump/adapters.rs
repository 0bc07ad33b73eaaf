//! Book-specific pump endpoints
//!
//! - `CsvBookSource` streams books out of a CSV file
//! - `RepositorySink` writes books into any book repository
//!
//! Together they form the `import` pipeline: a CSV file pumped into the
//! configured store with retries on storage failures.

use crate::io::async_reader::AsyncBookReader;
use crate::pump::traits::{ItemSink, ItemSource};
use crate::repository::Repository;
use crate::types::{Book, BookId, BoxError, CatalogError, WriteError};
use async_trait::async_trait;
use futures::future;
use futures::stream::{self, BoxStream, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tokio_util::compat::TokioAsyncReadCompatExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Streams books from a CSV file
///
/// The file is opened lazily when the stream is first polled. Rows follow the
/// codec's tolerance rules: the header and malformed rows are skipped; I/O
/// and encoding failures end the run as source errors.
#[derive(Debug, Clone)]
pub struct CsvBookSource {
    path: PathBuf,
}

impl CsvBookSource {
    /// Create a source reading `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the CSV file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ItemSource<Book> for CsvBookSource {
    fn read(&self, _cancel: CancellationToken) -> BoxStream<'_, Result<Book, BoxError>> {
        let path = self.path.clone();

        let open = async move {
            debug!(path = %path.display(), "Opening CSV source");
            tokio::fs::File::open(&path)
                .await
                .map_err(|e| BoxError::from(format!("Failed to open '{}': {}", path.display(), e)))
        };

        stream::once(open)
            .map(|opened| match opened {
                // Wrap tokio file in a compatibility layer for futures-io
                Ok(file) => AsyncBookReader::new(file.compat())
                    .into_stream()
                    .map(|record| record.map_err(BoxError::from))
                    .boxed(),
                Err(e) => stream::once(future::ready(Err(e))).boxed(),
            })
            .flatten()
            .boxed()
    }
}

/// Writes each item into a book repository
///
/// Repository errors are reported as retryable write failures. The repository
/// sits behind a mutex so the sink can be shared with the pump.
#[derive(Debug)]
pub struct RepositorySink<R> {
    repo: Mutex<R>,
}

impl<R: Repository<Book, BookId> + Send> RepositorySink<R> {
    /// Wrap a repository
    pub fn new(repo: R) -> Self {
        Self {
            repo: Mutex::new(repo),
        }
    }

    /// Snapshot of the books currently stored
    pub fn snapshot(&self) -> Result<Vec<Book>, CatalogError> {
        self.repo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .list_all()
    }

    /// Return the wrapped repository
    pub fn into_inner(self) -> R {
        self.repo.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn store(&self, book: &Book) -> Result<(), CatalogError> {
        let mut repo = self.repo.lock().unwrap_or_else(PoisonError::into_inner);
        repo.add(book.clone())?;
        Ok(())
    }
}

#[async_trait]
impl<R: Repository<Book, BookId> + Send> ItemSink<Book> for RepositorySink<R> {
    async fn write(&self, item: &Book, cancel: &CancellationToken) -> Result<(), WriteError> {
        if cancel.is_cancelled() {
            return Err(WriteError::Cancelled);
        }

        self.store(item).map_err(|e| {
            warn!(id = item.id, error = %e, "Repository write failed");
            WriteError::failed(e)
        })
    }
}
