use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::models::{Author, AuthorWithBooks, Book, NewAuthor};
use crate::database::store::{AuthorSession, AuthorStore, StoreError};

/// Mirrors the unique index name used by the PostgreSQL schema
const NAME_UNIQUE_CONSTRAINT: &str = "authors_name_key";

#[derive(Debug, Default)]
struct Tables {
    authors: BTreeMap<i32, Author>,
    books: BTreeMap<i32, Book>,
    /// (author_id, book_id)
    author_books: BTreeSet<(i32, i32)>,
    last_author_id: i32,
}

#[derive(Debug, Default)]
struct Shared {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

/// Process-local author storage used in development mode and tests.
/// Applies the same name uniqueness and cascade rules as the SQL schema.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthorStore {
    shared: Arc<Shared>,
}

impl InMemoryAuthorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stand-in for the book collaborator: register a book row
    pub async fn seed_book(&self, book: Book) {
        self.shared.tables.write().await.books.insert(book.id, book);
    }

    /// Stand-in for the book collaborator: link an existing author and book
    pub async fn link_book(&self, author_id: i32, book_id: i32) -> Result<(), StoreError> {
        let mut tables = self.shared.tables.write().await;
        if !tables.authors.contains_key(&author_id) || !tables.books.contains_key(&book_id) {
            return Err(StoreError::ConstraintViolation {
                constraint: Some("author_books_fkey".to_string()),
                unique: false,
                message: format!("author {} or book {} does not exist", author_id, book_id),
            });
        }
        tables.author_books.insert((author_id, book_id));
        Ok(())
    }

    /// Simulate the backend going away; sessions fail with `Unavailable` while set
    pub fn set_unavailable(&self, unavailable: bool) {
        self.shared.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn author_count(&self) -> usize {
        self.shared.tables.read().await.authors.len()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.shared.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthorStore for InMemoryAuthorStore {
    async fn session(&self) -> Result<Box<dyn AuthorSession>, StoreError> {
        self.check_available()?;
        Ok(Box::new(InMemoryAuthorSession {
            shared: Arc::clone(&self.shared),
        }))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}

pub struct InMemoryAuthorSession {
    shared: Arc<Shared>,
}

fn duplicate_name(name: &str) -> StoreError {
    StoreError::ConstraintViolation {
        constraint: Some(NAME_UNIQUE_CONSTRAINT.to_string()),
        unique: true,
        message: format!("duplicate key value violates unique constraint: name={}", name),
    }
}

#[async_trait]
impl AuthorSession for InMemoryAuthorSession {
    async fn list_authors(&mut self) -> Result<Vec<Author>, StoreError> {
        Ok(self.shared.tables.read().await.authors.values().cloned().collect())
    }

    async fn find_by_id(&mut self, id: i32) -> Result<Option<Author>, StoreError> {
        Ok(self.shared.tables.read().await.authors.get(&id).cloned())
    }

    async fn find_with_books(&mut self, id: i32) -> Result<Option<AuthorWithBooks>, StoreError> {
        let tables = self.shared.tables.read().await;
        let Some(author) = tables.authors.get(&id).cloned() else {
            return Ok(None);
        };

        // BTreeSet ordering keeps books sorted by id within one author
        let books = tables
            .author_books
            .range((id, i32::MIN)..=(id, i32::MAX))
            .filter_map(|(_, book_id)| tables.books.get(book_id).cloned())
            .collect();

        Ok(Some(AuthorWithBooks { author, books }))
    }

    async fn find_by_name_fragment(&mut self, fragment: &str) -> Result<Vec<Author>, StoreError> {
        Ok(self
            .shared
            .tables
            .read()
            .await
            .authors
            .values()
            .filter(|a| a.name.contains(fragment))
            .cloned()
            .collect())
    }

    async fn exists_by_name(&mut self, name: &str) -> Result<bool, StoreError> {
        Ok(self.shared.tables.read().await.authors.values().any(|a| a.name == name))
    }

    async fn exists_by_id(&mut self, id: i32) -> Result<bool, StoreError> {
        Ok(self.shared.tables.read().await.authors.contains_key(&id))
    }

    async fn insert(&mut self, author: NewAuthor) -> Result<Author, StoreError> {
        let mut tables = self.shared.tables.write().await;
        if tables.authors.values().any(|a| a.name == author.name) {
            return Err(duplicate_name(&author.name));
        }

        tables.last_author_id += 1;
        let created = author.with_id(tables.last_author_id);
        tables.authors.insert(created.id, created.clone());
        Ok(created)
    }

    async fn replace(&mut self, author: &Author) -> Result<bool, StoreError> {
        let mut tables = self.shared.tables.write().await;
        if tables
            .authors
            .values()
            .any(|a| a.id != author.id && a.name == author.name)
        {
            return Err(duplicate_name(&author.name));
        }

        match tables.authors.get_mut(&author.id) {
            Some(existing) => {
                *existing = author.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&mut self, id: i32) -> Result<(), StoreError> {
        let mut tables = self.shared.tables.write().await;
        tables.authors.remove(&id);
        tables.author_books.retain(|(author_id, _)| *author_id != id);
        Ok(())
    }
}
