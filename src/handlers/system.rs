// handlers/system.rs - GET / and GET /health (anonymous)

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");
    let authors = state.authors_path();

    Json(json!({
        "name": "Author API",
        "version": version,
        "environment": state.config.environment,
        "endpoints": {
            "list": format!("GET {} (administrator)", authors),
            "show": format!("GET {}/:id (anonymous, header {} for links)", authors, state.config.api.hateoas_header),
            "search": format!("GET {}/:name (administrator)", authors),
            "create": format!("POST {} (administrator)", authors),
            "update": format!("PUT {}/:id (administrator)", authors),
            "delete": format!("DELETE {}/:id (administrator)", authors),
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                })),
            )
        }
    }
}
