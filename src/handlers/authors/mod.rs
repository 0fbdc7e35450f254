// handlers/authors/mod.rs - Author resource handlers

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Extension,
};

use crate::auth::Caller;
use crate::error::ApiError;
use crate::routes::AuthorRoute;
use crate::state::AppState;

pub mod create; // POST   /authors
pub mod delete; // DELETE /authors/{id:int}
pub mod list; // GET    /authors
pub mod search; // GET    /authors/{name}
pub mod show; // GET    /authors/{id:int}
pub mod update; // PUT    /authors/{id:int}

pub use create::author_create;
pub use delete::author_delete;
pub use list::author_list;
pub use search::author_search;
pub use show::author_show;
pub use update::author_update;

/// GET /authors/:segment - both lookup by id and search by name share this path;
/// the route table has already decided which one applies.
pub async fn author_show_or_search(
    State(state): State<AppState>,
    Extension(route): Extension<AuthorRoute>,
    Extension(caller): Extension<Caller>,
    Path(segment): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    match route {
        AuthorRoute::GetById => {
            let id = parse_id(&segment)?;
            Ok(author_show(&state, &caller, id, &headers).await?.into_response())
        }
        AuthorRoute::SearchByName => Ok(author_search(&state, &segment).await?.into_response()),
        other => {
            tracing::error!("Route {:?} dispatched to GET /authors/:segment", other);
            Err(ApiError::internal_server_error("Route dispatch mismatch"))
        }
    }
}

/// Parse an `{id:int}` segment. The route table only admits integers here, so a
/// failure means the request never matched a real author.
pub(crate) fn parse_id(segment: &str) -> Result<i32, ApiError> {
    segment
        .parse::<i32>()
        .map_err(|_| ApiError::not_found(format!("Author {} not found", segment)))
}
