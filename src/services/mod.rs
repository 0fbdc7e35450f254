pub mod author_service;

pub use author_service::{AuthorService, ServiceError};
