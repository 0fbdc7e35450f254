// handlers/authors/update.rs - PUT /authors/{id:int} (administrator)

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use super::parse_id;
use crate::api::dto::AuthorCreationDto;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Full replace; the id in the path is authoritative
pub async fn author_update(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    payload: Result<Json<AuthorCreationDto>, JsonRejection>,
) -> ApiResult<()> {
    let id = parse_id(&segment)?;
    let Json(dto) = payload?;
    let dto = dto
        .validated()
        .map_err(|errors| ApiError::validation_error("Invalid author", Some(errors)))?;

    state.authors.update(id, dto).await?;
    Ok(ApiResponse::no_content())
}
