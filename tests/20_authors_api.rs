use std::sync::Arc;

use author_api::auth::{generate_jwt, Claims};
use author_api::config::AppConfig;
use author_api::database::models::Book;
use author_api::database::InMemoryAuthorStore;
use author_api::state::AppState;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "router-test-secret";

fn setup() -> (Router, InMemoryAuthorStore) {
    let store = InMemoryAuthorStore::new();
    let state = AppState::new(AppConfig::for_tests(SECRET), Arc::new(store.clone()));
    (author_api::app(state), store)
}

fn token(admin: bool) -> String {
    let email = if admin { "admin@example.com" } else { "reader@example.com" };
    generate_jwt(&Claims::new(email, admin, Duration::hours(1)), SECRET).unwrap()
}

struct Call {
    method: Method,
    uri: String,
    bearer: Option<String>,
    body: Option<String>,
    headers: Vec<(&'static str, &'static str)>,
}

impl Call {
    fn new(method: Method, uri: impl Into<String>) -> Self {
        Self { method, uri: uri.into(), bearer: None, body: None, headers: Vec::new() }
    }

    fn admin(self) -> Self {
        self.bearer(token(true))
    }

    fn bearer(mut self, token: String) -> Self {
        self.bearer = Some(token);
        self
    }

    fn json(mut self, body: Value) -> Self {
        self.body = Some(body.to_string());
        self
    }

    fn raw(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    fn header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }

    fn build(self) -> Request<Body> {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        if let Some(token) = self.bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }
        match self.body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }
}

struct Reply {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

async fn send(app: &Router, call: Call) -> Reply {
    let response = app.clone().oneshot(call.build()).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    Reply { status, location, body }
}

async fn create(app: &Router, name: &str) -> i64 {
    let reply = send(app, Call::new(Method::POST, "/api/authors").admin().json(json!({ "name": name }))).await;
    assert_eq!(reply.status, StatusCode::CREATED, "create {}: {}", name, reply.body);
    reply.body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn create_read_delete_lifecycle() {
    let (app, _store) = setup();

    let reply = send(&app, Call::new(Method::POST, "/api/authors").admin().json(json!({ "name": "Jane Doe" }))).await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.location.as_deref(), Some("/api/authors/1"));
    assert_eq!(reply.body, json!({ "id": 1, "name": "Jane Doe" }));

    let reply = send(&app, Call::new(Method::GET, "/api/authors/1")).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!({ "id": 1, "name": "Jane Doe", "books": [] }));

    let reply = send(&app, Call::new(Method::DELETE, "/api/authors/1").admin()).await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(&app, Call::new(Method::GET, "/api/authors/1")).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["code"], "NOT_FOUND");

    let reply = send(&app, Call::new(Method::DELETE, "/api/authors/1").admin()).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_requires_administrator() {
    let (app, _store) = setup();
    create(&app, "Ann").await;
    create(&app, "Bob").await;

    let reply = send(&app, Call::new(Method::GET, "/api/authors")).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["code"], "UNAUTHORIZED");

    let reply = send(&app, Call::new(Method::GET, "/api/authors").bearer(token(false))).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = send(&app, Call::new(Method::GET, "/api/authors").bearer("not.a.jwt".to_string())).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(&app, Call::new(Method::GET, "/api/authors").admin()).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!([{ "id": 1, "name": "Ann" }, { "id": 2, "name": "Bob" }]));
}

#[tokio::test]
async fn anonymous_lookup_ignores_bad_credentials() {
    let (app, _store) = setup();
    create(&app, "Jane Doe").await;

    let reply = send(&app, Call::new(Method::GET, "/api/authors/1").bearer("garbage".to_string())).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["name"], "Jane Doe");
}

#[tokio::test]
async fn missing_author_is_not_found_for_everyone() {
    let (app, _store) = setup();

    let reply = send(&app, Call::new(Method::GET, "/api/authors/999")).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = send(&app, Call::new(Method::GET, "/api/authors/999").admin()).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_name_is_rejected() {
    let (app, store) = setup();
    create(&app, "Jane Doe").await;

    let reply = send(&app, Call::new(Method::POST, "/api/authors").admin().json(json!({ "name": "Jane Doe" }))).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "DUPLICATE_NAME");
    assert!(reply.body["message"].as_str().unwrap().contains("Jane Doe"));
    assert_eq!(store.author_count().await, 1);
}

#[tokio::test]
async fn invalid_bodies_are_rejected() {
    let (app, store) = setup();

    let reply = send(&app, Call::new(Method::POST, "/api/authors").admin().json(json!({}))).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "VALIDATION_ERROR");

    let reply = send(&app, Call::new(Method::POST, "/api/authors").admin().json(json!({ "name": "   " }))).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "VALIDATION_ERROR");
    assert!(reply.body["field_errors"]["name"].is_string());

    let reply = send(&app, Call::new(Method::POST, "/api/authors").admin().raw("{\"name\": ")).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "INVALID_JSON");

    assert_eq!(store.author_count().await, 0);
}

#[tokio::test]
async fn authorization_is_checked_before_the_body() {
    let (app, store) = setup();

    let reply = send(&app, Call::new(Method::POST, "/api/authors").raw("not json")).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(&app, Call::new(Method::POST, "/api/authors").json(json!({ "name": "Sneaky" }))).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(store.author_count().await, 0);
}

#[tokio::test]
async fn non_administrator_cannot_mutate() {
    let (app, store) = setup();
    create(&app, "Jane Doe").await;

    let reply = send(
        &app,
        Call::new(Method::POST, "/api/authors").bearer(token(false)).json(json!({ "name": "Intruder" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body["code"], "FORBIDDEN");

    let reply = send(
        &app,
        Call::new(Method::PUT, "/api/authors/1").bearer(token(false)).json(json!({ "name": "Renamed" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = send(&app, Call::new(Method::DELETE, "/api/authors/1").bearer(token(false))).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    assert_eq!(store.author_count().await, 1);
    let reply = send(&app, Call::new(Method::GET, "/api/authors/1")).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["name"], "Jane Doe");
}

#[tokio::test]
async fn head_follows_get_rules() {
    let (app, _store) = setup();
    create(&app, "Jane Doe").await;

    let reply = send(&app, Call::new(Method::HEAD, "/api/authors/1")).await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(&app, Call::new(Method::HEAD, "/api/authors")).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_replaces_name_and_uses_path_id() {
    let (app, _store) = setup();
    create(&app, "Jane Doe").await;

    let reply = send(
        &app,
        Call::new(Method::PUT, "/api/authors/1").admin().json(json!({ "id": 42, "name": "Jane Smith" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    assert_eq!(reply.body, Value::Null);

    let reply = send(&app, Call::new(Method::GET, "/api/authors/1")).await;
    assert_eq!(reply.body["name"], "Jane Smith");

    let reply = send(&app, Call::new(Method::GET, "/api/authors/42")).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_of_missing_author_creates_nothing() {
    let (app, store) = setup();

    let reply = send(&app, Call::new(Method::PUT, "/api/authors/7").admin().json(json!({ "name": "Ghost" }))).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(store.author_count().await, 0);
}

#[tokio::test]
async fn update_to_taken_name_is_duplicate() {
    let (app, _store) = setup();
    create(&app, "Ann").await;
    create(&app, "Bob").await;

    let reply = send(&app, Call::new(Method::PUT, "/api/authors/2").admin().json(json!({ "name": "Ann" }))).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "DUPLICATE_NAME");

    // Renaming to its own current name is allowed
    let reply = send(&app, Call::new(Method::PUT, "/api/authors/2").admin().json(json!({ "name": "Bob" }))).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn non_numeric_segment_searches_by_name() {
    let (app, _store) = setup();
    create(&app, "Jane Doe").await;
    create(&app, "John Doe").await;
    create(&app, "Mary Major").await;

    let reply = send(&app, Call::new(Method::GET, "/api/authors/Doe").admin()).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!([{ "id": 1, "name": "Jane Doe" }, { "id": 2, "name": "John Doe" }]));

    let reply = send(&app, Call::new(Method::GET, "/api/authors/Jane%20Doe").admin()).await;
    assert_eq!(reply.body, json!([{ "id": 1, "name": "Jane Doe" }]));

    let reply = send(&app, Call::new(Method::GET, "/api/authors/Nobody").admin()).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!([]));

    // Search is an administrator operation even though lookup by id is not
    let reply = send(&app, Call::new(Method::GET, "/api/authors/Doe")).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn links_follow_header_and_caller() {
    let (app, _store) = setup();
    create(&app, "Jane Doe").await;

    let reply = send(&app, Call::new(Method::GET, "/api/authors/1")).await;
    assert!(reply.body.get("links").is_none());

    let reply = send(&app, Call::new(Method::GET, "/api/authors/1").header("includeHATEOAS", "false")).await;
    assert!(reply.body.get("links").is_none());

    let reply = send(&app, Call::new(Method::GET, "/api/authors/1").header("includeHATEOAS", "true")).await;
    assert_eq!(
        reply.body["links"],
        json!([{ "relation": "self", "href": "/api/authors/1", "method": "GET" }])
    );

    let reply = send(&app, Call::new(Method::GET, "/api/authors/1").admin().header("includeHATEOAS", "true")).await;
    let relations: Vec<&str> = reply.body["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|link| link["relation"].as_str().unwrap())
        .collect();
    assert_eq!(relations, vec!["self", "update-author", "delete-author"]);
}

#[tokio::test]
async fn books_are_expanded_in_id_order() {
    let (app, store) = setup();
    create(&app, "Jane Doe").await;

    let published = NaiveDate::from_ymd_opt(2001, 5, 17).unwrap().and_hms_opt(0, 0, 0).unwrap();
    store.seed_book(Book { id: 7, title: "Later".into(), publication_date: None }).await;
    store.seed_book(Book { id: 3, title: "Earlier".into(), publication_date: Some(published) }).await;
    store.link_book(1, 7).await.unwrap();
    store.link_book(1, 3).await.unwrap();

    let reply = send(&app, Call::new(Method::GET, "/api/authors/1")).await;
    assert_eq!(reply.status, StatusCode::OK);
    let books = reply.body["books"].as_array().unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0]["id"], 3);
    assert_eq!(books[0]["title"], "Earlier");
    assert!(books[0]["publicationDate"].is_string());
    assert_eq!(books[1]["id"], 7);
    assert!(books[1].get("publicationDate").is_none());
}

#[tokio::test]
async fn storage_outage_is_service_unavailable() {
    let (app, store) = setup();
    create(&app, "Jane Doe").await;
    store.set_unavailable(true);

    let reply = send(&app, Call::new(Method::GET, "/api/authors/1")).await;
    assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(reply.body["code"], "SERVICE_UNAVAILABLE");

    let reply = send(&app, Call::new(Method::GET, "/health")).await;
    assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);

    store.set_unavailable(false);
    let reply = send(&app, Call::new(Method::GET, "/api/authors/1")).await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn put_on_a_name_segment_is_not_allowed() {
    let (app, _store) = setup();

    let reply = send(&app, Call::new(Method::PUT, "/api/authors/Jane").admin().json(json!({ "name": "X" }))).await;
    assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn concurrent_creates_admit_one_author() {
    let (app, store) = setup();

    let attempts = (0..8).map(|_| {
        send(&app, Call::new(Method::POST, "/api/authors").admin().json(json!({ "name": "Racer" })))
    });
    let replies = futures::future::join_all(attempts).await;

    let created = replies.iter().filter(|r| r.status == StatusCode::CREATED).count();
    let duplicates = replies.iter().filter(|r| r.body["code"] == "DUPLICATE_NAME").count();
    assert_eq!(created, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(store.author_count().await, 1);
}

#[tokio::test]
async fn root_describes_the_service() {
    let (app, _store) = setup();

    let reply = send(&app, Call::new(Method::GET, "/")).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["name"], "Author API");
}
