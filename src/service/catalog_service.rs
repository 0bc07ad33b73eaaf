//! Catalog service
//!
//! Business rules on top of the repository contract. The service talks only to
//! `Repository<Book, BookId>` and never to a concrete backend, so the same rules
//! apply to the in-memory, CSV and JSON stores.
//!
//! # Rules
//!
//! - ids are positive
//! - title and author are not blank
//! - the year lies in `ValidationRules::min_year..=ValidationRules::max_year`
//! - `register` refuses an id that already exists (the repository itself upserts)

use crate::repository::{ReadRepository, Repository};
use crate::types::{Book, BookId, CatalogError};
use chrono::{Datelike, Utc};
use tracing::debug;

/// Bounds applied by [`validate_book`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    /// Earliest accepted publication year
    pub min_year: i32,
    /// Latest accepted publication year
    pub max_year: i32,
}

impl Default for ValidationRules {
    /// Years from 1000 up to next year
    fn default() -> Self {
        Self {
            min_year: 1000,
            max_year: Utc::now().year() + 1,
        }
    }
}

/// Check a book against the catalog's business rules
pub fn validate_book(book: &Book, rules: &ValidationRules) -> Result<(), CatalogError> {
    if book.id <= 0 {
        return Err(CatalogError::validation("id", "id must be greater than zero"));
    }

    if book.title.trim().is_empty() {
        return Err(CatalogError::validation("title", "title is required"));
    }

    if book.author.trim().is_empty() {
        return Err(CatalogError::validation("author", "author is required"));
    }

    if book.year < rules.min_year || book.year > rules.max_year {
        return Err(CatalogError::Validation {
            field: "year".to_string(),
            message: format!(
                "year must be between {} and {}",
                rules.min_year, rules.max_year
            ),
        });
    }

    Ok(())
}

/// Domain service for catalog operations
#[derive(Debug)]
pub struct CatalogService<R> {
    repo: R,
    rules: ValidationRules,
}

impl<R: Repository<Book, BookId>> CatalogService<R> {
    /// Create a service with the default validation rules
    pub fn new(repo: R) -> Self {
        Self::with_rules(repo, ValidationRules::default())
    }

    /// Create a service with custom validation rules
    pub fn with_rules(repo: R, rules: ValidationRules) -> Self {
        Self { repo, rules }
    }

    /// Borrow the underlying repository
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Consume the service and return the repository
    pub fn into_inner(self) -> R {
        self.repo
    }

    /// Register a new book
    ///
    /// # Errors
    ///
    /// * `CatalogError::Validation` if the book breaks a rule
    /// * `CatalogError::DuplicateBook` if the id is already taken
    /// * storage errors from the repository
    pub fn register(&mut self, book: Book) -> Result<Book, CatalogError> {
        validate_book(&book, &self.rules)?;

        if self.repo.get_by_id(&book.id)?.is_some() {
            return Err(CatalogError::duplicate_book(book.id));
        }

        debug!(id = book.id, "Registering book");
        self.repo.add(book)
    }

    /// All books in the repository's order
    pub fn list_all(&self) -> Result<Vec<Book>, CatalogError> {
        self.repo.list_all()
    }

    /// Find a book by id
    pub fn find_by_id(&self, id: BookId) -> Result<Option<Book>, CatalogError> {
        self.repo.get_by_id(&id)
    }

    /// Books whose author contains `author`, ignoring case
    ///
    /// A blank query matches nothing.
    pub fn find_by_author(&self, author: &str) -> Result<Vec<Book>, CatalogError> {
        self.search(author, |book| &book.author)
    }

    /// Books whose title contains `title`, ignoring case
    ///
    /// A blank query matches nothing.
    pub fn find_by_title(&self, title: &str) -> Result<Vec<Book>, CatalogError> {
        self.search(title, |book| &book.title)
    }

    /// Replace an existing book after validating it
    ///
    /// Returns `false` when no book has this id.
    pub fn update(&mut self, book: Book) -> Result<bool, CatalogError> {
        validate_book(&book, &self.rules)?;
        self.repo.update(book)
    }

    /// Change the title of an existing book
    ///
    /// Returns `false` when no book has this id; a blank title is rejected.
    pub fn update_title(&mut self, id: BookId, new_title: &str) -> Result<bool, CatalogError> {
        let Some(book) = self.repo.get_by_id(&id)? else {
            return Ok(false);
        };

        if new_title.trim().is_empty() {
            return Err(CatalogError::validation("title", "title cannot be empty"));
        }

        self.repo.update(book.with_title(new_title))
    }

    /// Remove a book; returns whether it existed
    pub fn remove_book(&mut self, id: BookId) -> Result<bool, CatalogError> {
        self.repo.remove(&id)
    }

    fn search<F>(&self, query: &str, field: F) -> Result<Vec<Book>, CatalogError>
    where
        F: Fn(&Book) -> &str,
    {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let needle = query.to_lowercase();
        Ok(self
            .repo
            .list_all()?
            .into_iter()
            .filter(|book| field(book).to_lowercase().contains(&needle))
            .collect())
    }
}

/// Titles of every book, for read-only reporting
pub fn list_titles<R>(repo: &R) -> Result<Vec<String>, CatalogError>
where
    R: ReadRepository<Book, BookId> + ?Sized,
{
    Ok(repo.list_all()?.into_iter().map(|book| book.title).collect())
}

/// Title of one book, for read-only reporting
pub fn find_title<R>(repo: &R, id: BookId) -> Result<Option<String>, CatalogError>
where
    R: ReadRepository<Book, BookId> + ?Sized,
{
    Ok(repo.get_by_id(&id)?.map(|book| book.title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;
    use rstest::rstest;

    type MemoryRepo = InMemoryRepository<Book, BookId>;

    fn rules() -> ValidationRules {
        ValidationRules {
            min_year: 1000,
            max_year: 2030,
        }
    }

    fn service() -> CatalogService<MemoryRepo> {
        CatalogService::with_rules(InMemoryRepository::new(|book: &Book| book.id), rules())
    }

    fn seeded() -> CatalogService<MemoryRepo> {
        let mut svc = service();
        svc.register(Book::new(1, "Clean Code", "Robert C. Martin", 2008)).unwrap();
        svc.register(Book::new(2, "Domain-Driven Design", "Eric Evans", 2003)).unwrap();
        svc.register(Book::new(3, "Clean Architecture", "Robert C. Martin", 2017)).unwrap();
        svc
    }

    #[test]
    fn test_register_new_book() {
        let mut svc = service();
        let book = Book::new(1, "Refactoring", "Martin Fowler", 1999);

        assert_eq!(svc.register(book.clone()).unwrap(), book);
        assert_eq!(svc.find_by_id(1).unwrap(), Some(book));
    }

    #[test]
    fn test_register_duplicate_is_rejected() {
        let mut svc = seeded();

        let result = svc.register(Book::new(1, "Other", "Someone", 2000));

        assert_eq!(result, Err(CatalogError::DuplicateBook { id: 1 }));
        assert_eq!(svc.find_by_id(1).unwrap().unwrap().title, "Clean Code");
    }

    #[rstest]
    #[case::zero_id(Book::new(0, "T", "A", 2000), "id")]
    #[case::negative_id(Book::new(-4, "T", "A", 2000), "id")]
    #[case::empty_title(Book::new(1, "", "A", 2000), "title")]
    #[case::blank_title(Book::new(1, "   ", "A", 2000), "title")]
    #[case::blank_author(Book::new(1, "T", "\t", 2000), "author")]
    #[case::year_too_old(Book::new(1, "T", "A", 999), "year")]
    #[case::year_in_future(Book::new(1, "T", "A", 2031), "year")]
    fn test_register_validation(#[case] book: Book, #[case] field: &str) {
        let mut svc = service();

        match svc.register(book) {
            Err(CatalogError::Validation { field: actual, .. }) => assert_eq!(actual, field),
            other => panic!("Expected validation error on {}, got {:?}", field, other),
        }
        assert!(svc.repository().is_empty());
    }

    #[rstest]
    #[case(1000)]
    #[case(2030)]
    fn test_year_bounds_are_inclusive(#[case] year: i32) {
        assert!(validate_book(&Book::new(1, "T", "A", year), &rules()).is_ok());
    }

    #[test]
    fn test_default_rules_accept_next_year() {
        let rules = ValidationRules::default();
        let next_year = Utc::now().year() + 1;

        assert!(validate_book(&Book::new(1, "T", "A", next_year), &rules).is_ok());
        assert!(validate_book(&Book::new(1, "T", "A", next_year + 1), &rules).is_err());
    }

    #[rstest]
    #[case::case_insensitive("robert", vec![1, 3])]
    #[case::partial("evan", vec![2])]
    #[case::no_match("Tolkien", vec![])]
    #[case::blank("  ", vec![])]
    fn test_find_by_author(#[case] query: &str, #[case] expected: Vec<BookId>) {
        let ids: Vec<BookId> = seeded().find_by_author(query).unwrap().iter().map(|b| b.id).collect();
        assert_eq!(ids, expected);
    }

    #[rstest]
    #[case::case_insensitive("CLEAN", vec![1, 3])]
    #[case::single("design", vec![2])]
    #[case::blank("", vec![])]
    fn test_find_by_title(#[case] query: &str, #[case] expected: Vec<BookId>) {
        let ids: Vec<BookId> = seeded().find_by_title(query).unwrap().iter().map(|b| b.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_update_title() {
        let mut svc = seeded();

        assert!(svc.update_title(2, "DDD").unwrap());
        assert_eq!(svc.find_by_id(2).unwrap().unwrap().title, "DDD");
        assert_eq!(svc.find_by_id(2).unwrap().unwrap().author, "Eric Evans");
    }

    #[test]
    fn test_update_title_missing_returns_false() {
        assert!(!seeded().update_title(99, "Anything").unwrap());
    }

    #[test]
    fn test_update_title_blank_is_rejected() {
        let mut svc = seeded();

        assert!(svc.update_title(1, " ").unwrap_err().is_validation());
        assert_eq!(svc.find_by_id(1).unwrap().unwrap().title, "Clean Code");
    }

    #[test]
    fn test_update_validates_and_reports_missing() {
        let mut svc = seeded();

        assert!(svc.update(Book::new(1, "", "X", 2000)).is_err());
        assert!(!svc.update(Book::new(42, "New", "X", 2000)).unwrap());
        assert!(svc.update(Book::new(1, "Clean Code 2e", "Robert C. Martin", 2025)).unwrap());
    }

    #[test]
    fn test_remove_book() {
        let mut svc = seeded();

        assert!(svc.remove_book(1).unwrap());
        assert!(!svc.remove_book(1).unwrap());
        assert_eq!(svc.list_all().unwrap().len(), 2);
    }

    #[test]
    fn test_report_helpers_need_only_read_access() {
        let svc = seeded();
        let repo = svc.repository();

        assert_eq!(
            list_titles(repo).unwrap(),
            vec!["Clean Code", "Domain-Driven Design", "Clean Architecture"]
        );
        assert_eq!(find_title(repo, 2).unwrap().as_deref(), Some("Domain-Driven Design"));
        assert_eq!(find_title(repo, 9).unwrap(), None);
    }
}
