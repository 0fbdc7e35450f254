pub mod author;
pub mod book;

pub use author::{Author, AuthorWithBooks, NewAuthor};
pub use book::Book;
