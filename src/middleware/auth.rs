use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::policy::{authorize, AuthUser, Caller};
use crate::auth::validate_jwt;
use crate::error::ApiError;
use crate::routes::{self, Resolution};
use crate::state::AppState;

/// Resolves the request against the route table, identifies the caller from the
/// bearer token and evaluates the route's access rule. On success the matched
/// `AuthorRoute` and the `Caller` are placed in request extensions.
pub async fn authorize_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let relative = path
        .strip_prefix(state.config.api.prefix.as_str())
        .unwrap_or(&path);

    let spec = match routes::resolve(&method, relative) {
        Resolution::Matched(spec) => spec,
        Resolution::MethodNotAllowed => {
            return Err(ApiError::MethodNotAllowed(format!("{} is not allowed on {}", method, path)))
        }
        Resolution::NotFound => return Err(ApiError::not_found(format!("No route for {}", path))),
    };

    let caller = caller_from_headers(request.headers(), &state.config.security.jwt_secret);

    if let Err(denial) = authorize(&caller, spec.access) {
        tracing::warn!(
            "Denied {} {} for {}: {}",
            method,
            path,
            caller.email().unwrap_or("anonymous"),
            denial
        );
        return Err(denial.into());
    }

    tracing::debug!("Authorized {:?} for {}", spec.route, caller.email().unwrap_or("anonymous"));

    request.extensions_mut().insert(spec.route);
    request.extensions_mut().insert(caller);

    Ok(next.run(request).await)
}

/// Identify the caller. Absence of a credential is not an error here; the gate
/// decides whether the route needs one.
pub fn caller_from_headers(headers: &HeaderMap, secret: &str) -> Caller {
    let token = match extract_jwt_from_headers(headers) {
        Ok(Some(token)) => token,
        Ok(None) => return Caller::Anonymous,
        Err(msg) => return Caller::InvalidCredential(msg),
    };

    match validate_jwt(&token, secret) {
        Ok(claims) => Caller::Authenticated(AuthUser::from(claims)),
        Err(e) => Caller::InvalidCredential(e.to_string()),
    }
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<Option<String>, String> {
    let Some(auth_header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        let token = token.trim();
        if token.is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(Some(token.to_string()))
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{generate_jwt, Claims};
    use axum::http::{header::AUTHORIZATION, HeaderValue};
    use chrono::Duration;

    const SECRET: &str = "middleware-secret";

    fn with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn no_header_is_anonymous() {
        assert_eq!(caller_from_headers(&HeaderMap::new(), SECRET), Caller::Anonymous);
    }

    #[test]
    fn non_bearer_scheme_is_invalid() {
        assert!(matches!(
            caller_from_headers(&with_auth("Basic dXNlcjpwYXNz"), SECRET),
            Caller::InvalidCredential(_)
        ));
        assert!(matches!(
            caller_from_headers(&with_auth("Bearer   "), SECRET),
            Caller::InvalidCredential(_)
        ));
    }

    #[test]
    fn valid_token_yields_authenticated_caller() {
        let token = generate_jwt(&Claims::new("root@example.com", true, Duration::hours(1)), SECRET).unwrap();
        let caller = caller_from_headers(&with_auth(&format!("Bearer {}", token)), SECRET);
        assert_eq!(
            caller,
            Caller::Authenticated(AuthUser { email: "root@example.com".into(), admin: true })
        );
    }

    #[test]
    fn token_signed_elsewhere_is_invalid() {
        let token = generate_jwt(&Claims::new("x@example.com", true, Duration::hours(1)), "other").unwrap();
        assert!(matches!(
            caller_from_headers(&with_auth(&format!("Bearer {}", token)), SECRET),
            Caller::InvalidCredential(_)
        ));
    }
}
