//! Integration test harness for Stockroom.
//!
//! Tests drive the real router in-process via `tower::ServiceExt::oneshot`
//! against the in-memory storage backend, so they need no running database
//! or server.
//!
//! ```rust,ignore
//! let app = harness::test_app();
//! let (status, body) = harness::get(&app, "/health").await;
//! assert_eq!(status, 200);
//! assert_eq!(body["status"], "ok");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use stockroom_server::config::ServerConfig;
use stockroom_server::db::MemoryStore;
use stockroom_server::routes;
use stockroom_server::state::AppState;

/// Build the full application router over a fresh in-memory store.
#[must_use]
pub fn test_app() -> Router {
    let config = ServerConfig {
        database_url: None,
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
    };
    let state = AppState::new(config, Arc::new(MemoryStore::new()));
    routes::routes().with_state(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should not fail at the transport level");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be JSON")
    };
    (status, body)
}

/// GET a path and parse the JSON response.
pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

/// POST a JSON body to a path and parse the JSON response.
pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    send(app, request).await
}

/// DELETE a path and parse the JSON response (if any).
pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::delete(uri)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

/// Create a store via the API and return its id.
pub async fn create_store(app: &Router, name: &str) -> i64 {
    let (status, body) = post_json(
        app,
        "/stores/",
        &serde_json::json!({"name": name, "address": "1 Test St"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create store failed: {body}");
    body["id"].as_i64().expect("store id")
}

/// Create a supplier via the API and return its id.
pub async fn create_supplier(app: &Router, name: &str) -> i64 {
    let (status, body) = post_json(
        app,
        "/suppliers/",
        &serde_json::json!({"name": name, "contact_email": "orders@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create supplier failed: {body}");
    body["id"].as_i64().expect("supplier id")
}

/// Create a product via the API and return its id.
pub async fn create_product(app: &Router, name: &str, sku: &str) -> i64 {
    let (status, body) = post_json(
        app,
        "/products/",
        &serde_json::json!({"name": name, "sku": sku}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create product failed: {body}");
    body["id"].as_i64().expect("product id")
}
