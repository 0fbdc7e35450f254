use sqlx::FromRow;

use super::Book;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Author {
    pub id: i32,
    pub name: String,
}

/// Author row before storage has assigned an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub name: String,
}

impl NewAuthor {
    pub fn with_id(self, id: i32) -> Author {
        Author { id, name: self.name }
    }
}

/// An author together with every book linked through the author/book join table
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorWithBooks {
    pub author: Author,
    pub books: Vec<Book>,
}
