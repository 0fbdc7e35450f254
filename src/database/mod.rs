pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::InMemoryAuthorStore;
pub use postgres::PgAuthorStore;
pub use store::{AuthorSession, AuthorStore, StoreError};
