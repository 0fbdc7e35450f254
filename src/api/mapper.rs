//! Explicit projections between storage rows and wire DTOs. Every field
//! transfer is spelled out; storage types never cross the API boundary.

use crate::api::dto::{AuthorCreationDto, AuthorDto, AuthorWithBooksDto, BookSummaryDto};
use crate::database::models::{Author, Book, NewAuthor};

pub fn to_dto(author: &Author) -> AuthorDto {
    AuthorDto {
        id: author.id,
        name: author.name.clone(),
    }
}

pub fn to_dtos(authors: &[Author]) -> Vec<AuthorDto> {
    authors.iter().map(to_dto).collect()
}

pub fn to_book_summary(book: &Book) -> BookSummaryDto {
    BookSummaryDto {
        id: book.id,
        title: book.title.clone(),
        publication_date: book.publication_date,
    }
}

/// Links are left unset; the HATEOAS enricher decides whether to add them
pub fn to_dto_with_books(author: &Author, books: &[Book]) -> AuthorWithBooksDto {
    AuthorWithBooksDto {
        id: author.id,
        name: author.name.clone(),
        books: books.iter().map(to_book_summary).collect(),
        links: None,
    }
}

pub fn from_creation_dto(dto: AuthorCreationDto) -> NewAuthor {
    NewAuthor { name: dto.name }
}
