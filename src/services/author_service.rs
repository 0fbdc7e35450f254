use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::dto::{AuthorCreationDto, AuthorDto, AuthorWithBooksDto};
use crate::api::mapper;
use crate::database::store::{AuthorSession, AuthorStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Author {0} not found")]
    NotFound(i32),

    #[error("An author named '{0}' already exists")]
    DuplicateName(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Orchestrates author operations over one storage session per call.
/// Input DTOs are expected to be validated already.
#[derive(Clone)]
pub struct AuthorService {
    store: Arc<dyn AuthorStore>,
}

impl AuthorService {
    pub fn new(store: Arc<dyn AuthorStore>) -> Self {
        Self { store }
    }

    async fn session(&self) -> Result<Box<dyn AuthorSession>, ServiceError> {
        Ok(self.store.session().await?)
    }

    pub async fn list(&self) -> Result<Vec<AuthorDto>, ServiceError> {
        let mut session = self.session().await?;
        let authors = session.list_authors().await?;
        debug!("Listed {} authors", authors.len());
        Ok(mapper::to_dtos(&authors))
    }

    /// Author plus linked books. Links are added by the caller, not here.
    pub async fn get_with_books(&self, id: i32) -> Result<AuthorWithBooksDto, ServiceError> {
        let mut session = self.session().await?;
        let expanded = session
            .find_with_books(id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        Ok(mapper::to_dto_with_books(&expanded.author, &expanded.books))
    }

    pub async fn search_by_name(&self, fragment: &str) -> Result<Vec<AuthorDto>, ServiceError> {
        let mut session = self.session().await?;
        let authors = session.find_by_name_fragment(fragment).await?;
        debug!("Name search '{}' matched {} authors", fragment, authors.len());
        Ok(mapper::to_dtos(&authors))
    }

    pub async fn create(&self, dto: AuthorCreationDto) -> Result<AuthorDto, ServiceError> {
        let mut session = self.session().await?;

        if session.exists_by_name(&dto.name).await? {
            warn!("Rejected create: author '{}' already exists", dto.name);
            return Err(ServiceError::DuplicateName(dto.name));
        }

        let name = dto.name.clone();
        let created = session
            .insert(mapper::from_creation_dto(dto))
            .await
            .map_err(|e| translate_unique_violation(e, &name))?;

        info!("Created author {} ('{}')", created.id, created.name);
        Ok(mapper::to_dto(&created))
    }

    /// Full replace. The path id wins over anything the client put in the body.
    pub async fn update(&self, id: i32, dto: AuthorCreationDto) -> Result<(), ServiceError> {
        let mut session = self.session().await?;

        if !session.exists_by_id(id).await? {
            return Err(ServiceError::NotFound(id));
        }

        let name = dto.name.clone();
        let author = mapper::from_creation_dto(dto).with_id(id);
        let replaced = session
            .replace(&author)
            .await
            .map_err(|e| translate_unique_violation(e, &name))?;

        // Deleted between the existence check and the write
        if !replaced {
            return Err(ServiceError::NotFound(id));
        }

        info!("Replaced author {} ('{}')", id, name);
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let mut session = self.session().await?;

        if !session.exists_by_id(id).await? {
            return Err(ServiceError::NotFound(id));
        }

        session.delete_by_id(id).await?;
        info!("Deleted author {}", id);
        Ok(())
    }
}

/// A concurrent writer can slip past the existence check; the unique index catches it
fn translate_unique_violation(err: StoreError, name: &str) -> ServiceError {
    if err.is_unique_violation() {
        warn!("Unique index rejected author name '{}'", name);
        ServiceError::DuplicateName(name.to_string())
    } else {
        ServiceError::Storage(err)
    }
}
