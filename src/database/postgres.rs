use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};

use crate::database::models::{Author, AuthorWithBooks, Book, NewAuthor};
use crate::database::store::{AuthorSession, AuthorStore, StoreError};

/// PostgreSQL-backed author storage. Expects the schema in `sql/schema.sql`,
/// including the unique index on `authors.name`.
#[derive(Clone)]
pub struct PgAuthorStore {
    pool: PgPool,
}

impl PgAuthorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorStore for PgAuthorStore {
    async fn session(&self) -> Result<Box<dyn AuthorSession>, StoreError> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(PgAuthorSession { conn }))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Holds one pooled connection for the lifetime of a request
pub struct PgAuthorSession {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl AuthorSession for PgAuthorSession {
    async fn list_authors(&mut self) -> Result<Vec<Author>, StoreError> {
        let authors = sqlx::query_as::<_, Author>("SELECT id, name FROM authors ORDER BY id")
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(authors)
    }

    async fn find_by_id(&mut self, id: i32) -> Result<Option<Author>, StoreError> {
        let author = sqlx::query_as::<_, Author>("SELECT id, name FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(author)
    }

    async fn find_with_books(&mut self, id: i32) -> Result<Option<AuthorWithBooks>, StoreError> {
        let Some(author) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.id, b.title, b.publication_date
            FROM books b
            INNER JOIN author_books ab ON ab.book_id = b.id
            WHERE ab.author_id = $1
            ORDER BY b.id
            "#,
        )
        .bind(id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(Some(AuthorWithBooks { author, books }))
    }

    async fn find_by_name_fragment(&mut self, fragment: &str) -> Result<Vec<Author>, StoreError> {
        // strpos avoids LIKE wildcard escaping; matches anywhere in the name
        let authors = sqlx::query_as::<_, Author>(
            "SELECT id, name FROM authors WHERE strpos(name, $1) > 0 ORDER BY id",
        )
        .bind(fragment)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(authors)
    }

    async fn exists_by_name(&mut self, name: &str) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE name = $1)")
            .bind(name)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(exists)
    }

    async fn exists_by_id(&mut self, id: i32) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(exists)
    }

    async fn insert(&mut self, author: NewAuthor) -> Result<Author, StoreError> {
        let created = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&author.name)
        .fetch_one(&mut *self.conn)
        .await?;
        Ok(created)
    }

    async fn replace(&mut self, author: &Author) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE authors SET name = $2 WHERE id = $1")
            .bind(author.id)
            .bind(&author.name)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            tracing::warn!("Replace of author {} touched no rows (deleted concurrently?)", author.id);
            return Ok(false);
        }
        Ok(true)
    }

    async fn delete_by_id(&mut self, id: i32) -> Result<(), StoreError> {
        // author_books rows go with it via ON DELETE CASCADE
        sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }
}
