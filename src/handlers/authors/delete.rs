// handlers/authors/delete.rs - DELETE /authors/{id:int} (administrator)

use axum::extract::{Path, State};

use super::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn author_delete(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&segment)?;
    state.authors.delete(id).await?;
    Ok(ApiResponse::ok())
}
