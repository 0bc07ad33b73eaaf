//! Repository contract
//!
//! The five keyed-store operations are split by capability: callers that only
//! query depend on [`ReadRepository`], callers that mutate on
//! [`WriteRepository`], and [`Repository`] is implemented for anything that
//! provides both. Every backend implements the two halves independently; there
//! is no shared base state.
//!
//! Absence is never an error: lookups return `Option` and conditional
//! mutations return `bool`. `Err` is reserved for storage failures.

use crate::types::CatalogError;

/// Query half of the repository contract
pub trait ReadRepository<T, Id> {
    /// Look up an entity by id without mutating anything
    fn get_by_id(&self, id: &Id) -> Result<Option<T>, CatalogError>;

    /// Snapshot copy of all entities
    ///
    /// Mutating the returned vector never affects the store.
    fn list_all(&self) -> Result<Vec<T>, CatalogError>;
}

/// Mutation half of the repository contract
pub trait WriteRepository<T, Id> {
    /// Upsert: replace the entity with the same id, or insert it
    fn add(&mut self, entity: T) -> Result<T, CatalogError>;

    /// Replace only if the id already exists; returns whether it did
    fn update(&mut self, entity: T) -> Result<bool, CatalogError>;

    /// Delete only if present; returns whether it did
    fn remove(&mut self, id: &Id) -> Result<bool, CatalogError>;
}

/// Full repository contract: read and write capabilities together
pub trait Repository<T, Id>: ReadRepository<T, Id> + WriteRepository<T, Id> {}

impl<T, Id, R> Repository<T, Id> for R where R: ReadRepository<T, Id> + WriteRepository<T, Id> {}

impl<T, Id, R> ReadRepository<T, Id> for Box<R>
where
    R: ReadRepository<T, Id> + ?Sized,
{
    fn get_by_id(&self, id: &Id) -> Result<Option<T>, CatalogError> {
        (**self).get_by_id(id)
    }

    fn list_all(&self) -> Result<Vec<T>, CatalogError> {
        (**self).list_all()
    }
}

impl<T, Id, R> WriteRepository<T, Id> for Box<R>
where
    R: WriteRepository<T, Id> + ?Sized,
{
    fn add(&mut self, entity: T) -> Result<T, CatalogError> {
        (**self).add(entity)
    }

    fn update(&mut self, entity: T) -> Result<bool, CatalogError> {
        (**self).update(entity)
    }

    fn remove(&mut self, id: &Id) -> Result<bool, CatalogError> {
        (**self).remove(id)
    }
}
