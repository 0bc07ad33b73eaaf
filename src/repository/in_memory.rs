//! In-memory repository
//!
//! Stores entities in an ordered map keyed by an id that is extracted from the
//! entity by a caller-supplied function. No I/O, deterministic, used for tests,
//! prototyping and as the `memory` store of the CLI.

use crate::repository::traits::{ReadRepository, WriteRepository};
use crate::types::CatalogError;
use std::collections::BTreeMap;
use std::fmt;

type IdSelector<T, Id> = Box<dyn Fn(&T) -> Id + Send + Sync>;

/// Map-backed repository
///
/// `list_all` returns entities ordered by id.
pub struct InMemoryRepository<T, Id> {
    /// Map of id to entity
    store: BTreeMap<Id, T>,
    /// Extracts the id from an entity; ids are never generated here
    id_of: IdSelector<T, Id>,
    /// Number of mutations that changed the store
    operations: usize,
}

impl<T, Id> InMemoryRepository<T, Id>
where
    T: Clone,
    Id: Ord + Clone,
{
    /// Create an empty repository
    ///
    /// # Arguments
    ///
    /// * `id_of` - Pure function returning the id of an entity
    pub fn new<F>(id_of: F) -> Self
    where
        F: Fn(&T) -> Id + Send + Sync + 'static,
    {
        Self {
            store: BTreeMap::new(),
            id_of: Box::new(id_of),
            operations: 0,
        }
    }

    /// Whether an entity with this id is stored
    pub fn exists(&self, id: &Id) -> bool {
        self.store.contains_key(id)
    }

    /// Number of stored entities
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the repository holds no entities
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Remove every entity
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Number of successful `add`/`update`/`remove` calls
    pub fn operation_count(&self) -> usize {
        self.operations
    }
}

impl<T, Id> ReadRepository<T, Id> for InMemoryRepository<T, Id>
where
    T: Clone,
    Id: Ord + Clone,
{
    fn get_by_id(&self, id: &Id) -> Result<Option<T>, CatalogError> {
        Ok(self.store.get(id).cloned())
    }

    fn list_all(&self) -> Result<Vec<T>, CatalogError> {
        Ok(self.store.values().cloned().collect())
    }
}

impl<T, Id> WriteRepository<T, Id> for InMemoryRepository<T, Id>
where
    T: Clone,
    Id: Ord + Clone,
{
    fn add(&mut self, entity: T) -> Result<T, CatalogError> {
        let id = (self.id_of)(&entity);
        self.store.insert(id, entity.clone());
        self.operations += 1;
        Ok(entity)
    }

    fn update(&mut self, entity: T) -> Result<bool, CatalogError> {
        let id = (self.id_of)(&entity);
        match self.store.get_mut(&id) {
            Some(slot) => {
                *slot = entity;
                self.operations += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&mut self, id: &Id) -> Result<bool, CatalogError> {
        let removed = self.store.remove(id).is_some();
        if removed {
            self.operations += 1;
        }
        Ok(removed)
    }
}

impl<T, Id: fmt::Debug> fmt::Debug for InMemoryRepository<T, Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("ids", &self.store.keys().collect::<Vec<_>>())
            .field("operations", &self.operations)
            .finish()
    }
}
