//! End-to-end tests driving the full router against an in-memory database.

use std::collections::BTreeMap;

use axum::body::{to_bytes, Body};
use axum::Router;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use cubby_daemon::http_server::router;
use cubby_daemon::{Database, ServiceState, TokenTable};

const OWNER_TOKEN: &str = "owner-token";
const OWNER: &str = "owner@example.com";
const OTHER_TOKEN: &str = "other-token";
const OTHER: &str = "other@example.com";

async fn app() -> Router {
    let db_url = url::Url::parse("sqlite::memory:").unwrap();
    let database = Database::connect(&db_url).await.unwrap();

    let mut tokens = BTreeMap::new();
    tokens.insert(OWNER_TOKEN.to_string(), OWNER.to_string());
    tokens.insert(OTHER_TOKEN.to_string(), OTHER.to_string());

    router(ServiceState::new(database, TokenTable::new(&tokens)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn put(path: &str, token: Option<&str>, access: Option<&str>, content: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("PUT")
        .uri(path)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    if let Some(access) = access {
        builder = builder.header("Public-Access", access);
    }
    builder.body(Body::from(content.to_string())).unwrap()
}

fn get(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn error(message: &str) -> Value {
    json!({ "error": message })
}

#[tokio::test]
async fn test_anonymous_cannot_create_bundle() {
    let app = app().await;

    let (status, body) = send(&app, put("/r/notes/a.json", None, None, json!({"x": 1}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, error("Authentication required to create bundle"));

    let (status, _) = send(&app, get("/r/notes/a.json", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_then_public_read() {
    let app = app().await;

    let (status, body) = send(
        &app,
        put("/r/notes/a.json", Some(OWNER_TOKEN), None, json!({"x": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"status": "created"}));

    let (status, body) = send(&app, get("/r/notes/a.json", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"x": 1}));

    let (status, body) = send(&app, get("/r/notes/missing.json", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, error("Resource not found"));
}

#[tokio::test]
async fn test_non_owner_write_denied() {
    let app = app().await;
    send(&app, put("/r/notes/a.json", Some(OWNER_TOKEN), None, json!(1))).await;

    let (status, body) = send(&app, put("/r/notes/a.json", Some(OTHER_TOKEN), None, json!(2))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, error("Write access denied"));

    let (status, body) = send(&app, put("/r/notes/b.json", None, None, json!(2))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, error("Write access denied"));

    let (_, body) = send(&app, get("/r/notes/a.json", None)).await;
    assert_eq!(body, json!(1));
}

#[tokio::test]
async fn test_private_resource_owner_only() {
    let app = app().await;
    let (status, _) = send(
        &app,
        put("/r/notes/secret.json", Some(OWNER_TOKEN), Some("none"), json!({"pin": 1234})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    for token in [None, Some(OTHER_TOKEN)] {
        let (status, body) = send(&app, get("/r/notes/secret.json", token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, error("Read access denied"));
    }

    let (status, body) = send(&app, get("/r/notes/secret.json", Some(OWNER_TOKEN))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"pin": 1234}));
}

#[tokio::test]
async fn test_public_write_keeps_owner() {
    let app = app().await;
    send(
        &app,
        put("/r/board/wall.json", Some(OWNER_TOKEN), Some("public-write"), json!([])),
    )
    .await;

    let (status, _) = send(
        &app,
        put("/r/board/wall.json", None, Some("write"), json!(["hello"])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        put("/r/board/other.json", Some(OTHER_TOKEN), Some("write"), json!("hi")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Ownership stayed with the creator
    let (status, body) = send(
        &app,
        put("/r/board/mine.json", Some(OTHER_TOKEN), None, json!("mine")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, error("Write access denied"));

    let (status, _) = send(
        &app,
        put("/r/board/mine.json", Some(OWNER_TOKEN), None, json!("mine")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, get("/r/board/wall.json", None)).await;
    assert_eq!(body, json!(["hello"]));
}

#[tokio::test]
async fn test_unrecognized_access_header_is_public_read() {
    let app = app().await;
    send(
        &app,
        put("/r/notes/a.json", Some(OWNER_TOKEN), Some("WRITE"), json!(1)),
    )
    .await;

    let (status, _) = send(&app, get("/r/notes/a.json", None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, put("/r/notes/a.json", Some(OTHER_TOKEN), None, json!(2))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_filters_by_requester() {
    let app = app().await;
    send(&app, put("/r/notes/public.json", Some(OWNER_TOKEN), None, json!({"p": 1}))).await;
    send(
        &app,
        put("/r/notes/private.json", Some(OWNER_TOKEN), Some("none"), json!({"s": 2})),
    )
    .await;

    let (status, body) = send(&app, get("/r/notes", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"public.json": {"p": 1}}]));

    let (status, body) = send(&app, get("/r/notes", Some(OWNER_TOKEN))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"public.json": {"p": 1}}, {"private.json": {"s": 2}}])
    );
}

#[tokio::test]
async fn test_list_without_readable_resources() {
    let app = app().await;
    send(
        &app,
        put("/r/vault/a.json", Some(OWNER_TOKEN), Some("public-none"), json!(1)),
    )
    .await;

    let (status, body) = send(&app, get("/r/vault", Some(OTHER_TOKEN))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, error("No readable resources"));

    let (status, body) = send(&app, get("/r/nothing-here", None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, error("No readable resources"));
}

#[tokio::test]
async fn test_bad_credentials_rejected() {
    let app = app().await;

    let (status, body) = send(&app, get("/r/notes/a.json", Some("not-a-token"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, error("Invalid credentials"));

    let request = Request::builder()
        .uri("/r/notes")
        .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, error("Invalid credentials"));
}

#[tokio::test]
async fn test_percent_encoded_names() {
    let app = app().await;
    let (status, _) = send(
        &app,
        put("/r/my%20notes/a%2Fb.json", Some(OWNER_TOKEN), None, json!("nested")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, get("/r/my%20notes", None)).await;
    assert_eq!(body, json!([{"a/b.json": "nested"}]));
}

#[tokio::test]
async fn test_status_routes() {
    let app = app().await;

    let (status, body) = send(&app, get("/_status/livez", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = send(&app, get("/_status/readyz", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = send(&app, get("/_status/version", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("version").is_some());
}

#[tokio::test]
async fn test_unknown_route_not_found() {
    let app = app().await;

    let request = Request::builder()
        .uri("/nope")
        .header(ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found", "path": "/nope"}));
}

#[tokio::test]
async fn test_bearer_scheme_any_case() {
    let app = app().await;

    let request = Request::builder()
        .method("PUT")
        .uri("/r/notes/a.json")
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("bearer {}", OWNER_TOKEN))
        .header("Public-Access", "none")
        .body(Body::from(json!(1).to_string()))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);

    let request = Request::builder()
        .uri("/r/notes/a.json")
        .header(AUTHORIZATION, format!("BEARER {}", OWNER_TOKEN))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(1));
}
