// handlers/authors/search.rs - GET /authors/{name} (administrator)

use crate::api::dto::AuthorDto;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Substring match on author names; an empty result is still 200
pub async fn author_search(state: &AppState, fragment: &str) -> ApiResult<Vec<AuthorDto>> {
    let authors = state.authors.search_by_name(fragment).await?;
    Ok(ApiResponse::success(authors))
}
