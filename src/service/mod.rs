//! Service module
//!
//! Domain services that apply business rules on top of the repository
//! contract.

pub mod catalog_service;

pub use catalog_service::{find_title, list_titles, validate_book, CatalogService, ValidationRules};
