// handlers/authors/list.rs - GET /authors (administrator)

use axum::extract::State;

use crate::api::dto::AuthorDto;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn author_list(State(state): State<AppState>) -> ApiResult<Vec<AuthorDto>> {
    let authors = state.authors.list().await?;
    Ok(ApiResponse::success(authors))
}
