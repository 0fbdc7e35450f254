// handlers/authors/create.rs - POST /authors (administrator)

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::api::dto::{AuthorCreationDto, AuthorDto};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Responds 201 with the new author and a Location pointing at GET /authors/{id}
pub async fn author_create(
    State(state): State<AppState>,
    payload: Result<Json<AuthorCreationDto>, JsonRejection>,
) -> ApiResult<AuthorDto> {
    let Json(dto) = payload?;
    let dto = dto
        .validated()
        .map_err(|errors| ApiError::validation_error("Invalid author", Some(errors)))?;

    let created = state.authors.create(dto).await?;
    let location = format!("{}/{}", state.authors_path(), created.id);

    Ok(ApiResponse::created_at(created, location))
}
