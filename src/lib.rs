pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{authors, system};
use crate::state::AppState;

/// Build the HTTP application. Every author route passes through the
/// authorization middleware, which consults `routes::ROUTES`.
pub fn app(state: AppState) -> Router {
    let prefix = state.config.api.prefix.clone();

    let author_routes = Router::new()
        .route(
            &format!("{}/authors", prefix),
            get(authors::author_list).post(authors::author_create),
        )
        .route(
            &format!("{}/authors/:segment", prefix),
            get(authors::author_show_or_search)
                .put(authors::author_update)
                .delete(authors::author_delete),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::authorize_middleware,
        ));

    let mut router = Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(author_routes);

    if let Some(cors) = cors_layer(&state.config) {
        router = router.layer(cors);
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    if !config.security.enable_cors {
        return None;
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
            .expose_headers([header::LOCATION]),
    )
}
