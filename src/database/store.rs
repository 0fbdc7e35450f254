use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{Author, AuthorWithBooks, NewAuthor};

/// Errors from the storage gateway
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transient backend failure: pool exhausted, connection lost, store shut down
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Constraint violation ({}): {message}", .constraint.as_deref().unwrap_or("unnamed"))]
    ConstraintViolation {
        constraint: Option<String>,
        unique: bool,
        message: String,
    },

    #[error("Query error: {0}")]
    Query(String),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::ConstraintViolation { unique: true, .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::WorkerCrashed => {
                StoreError::Unavailable(err.to_string())
            }
            sqlx::Error::Io(e) => StoreError::Unavailable(e.to_string()),
            sqlx::Error::Tls(e) => StoreError::Unavailable(e.to_string()),
            sqlx::Error::Database(db_err) => {
                let unique = db_err.is_unique_violation();
                if unique || db_err.is_foreign_key_violation() || db_err.is_check_violation() {
                    StoreError::ConstraintViolation {
                        constraint: db_err.constraint().map(str::to_string),
                        unique,
                        message: db_err.message().to_string(),
                    }
                } else {
                    StoreError::Query(db_err.message().to_string())
                }
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Shared handle to author storage. Hands out one scoped session per request.
#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// Acquire a session; it is released when dropped, on success and failure alike
    async fn session(&self) -> Result<Box<dyn AuthorSession>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// A single unit of work against storage. Methods take `&mut self`, so calls on
/// one session are strictly sequential.
#[async_trait]
pub trait AuthorSession: Send {
    /// Every author in storage order
    async fn list_authors(&mut self) -> Result<Vec<Author>, StoreError>;

    async fn find_by_id(&mut self, id: i32) -> Result<Option<Author>, StoreError>;

    /// Author plus linked books, books ordered by id
    async fn find_with_books(&mut self, id: i32) -> Result<Option<AuthorWithBooks>, StoreError>;

    /// Authors whose name contains `fragment` anywhere (case-sensitive)
    async fn find_by_name_fragment(&mut self, fragment: &str) -> Result<Vec<Author>, StoreError>;

    async fn exists_by_name(&mut self, name: &str) -> Result<bool, StoreError>;

    async fn exists_by_id(&mut self, id: i32) -> Result<bool, StoreError>;

    async fn insert(&mut self, author: NewAuthor) -> Result<Author, StoreError>;

    /// Full replace of the row with `author.id`. `Ok(false)` when no such row exists.
    async fn replace(&mut self, author: &Author) -> Result<bool, StoreError>;

    async fn delete_by_id(&mut self, id: i32) -> Result<(), StoreError>;
}
