// handlers/authors/show.rs - GET /authors/{id:int} (anonymous)

use axum::http::HeaderMap;

use crate::api::dto::AuthorWithBooksDto;
use crate::api::hateoas;
use crate::auth::Caller;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Author with expanded books; links appended when the HATEOAS header asks for them
pub async fn author_show(
    state: &AppState,
    caller: &Caller,
    id: i32,
    headers: &HeaderMap,
) -> ApiResult<AuthorWithBooksDto> {
    let dto = state.authors.get_with_books(id).await?;

    let include_links = hateoas::links_requested(headers, &state.config.api.hateoas_header);
    let dto = hateoas::enrich(dto, caller, include_links, &state.authors_path());

    Ok(ApiResponse::success(dto))
}
