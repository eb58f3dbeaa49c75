//! Shared helpers for API integration tests.
//!
//! Every test app is backed by a JSON-file store inside a [`TempDir`], so
//! no database is needed.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use formsmith_api::config::{LogFormat, ServerConfig, StoreBackend};
use formsmith_api::router::build_app_router;
use formsmith_api::state::AppState;
use formsmith_core::catalog::FieldCatalog;
use formsmith_db::store::JsonFileStore;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults, storing forms under `dir`.
pub fn test_config(dir: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        store: StoreBackend::File {
            path: forms_file(dir),
        },
        log_format: LogFormat::Pretty,
    }
}

pub fn forms_file(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("forms.json")
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(dir: &TempDir) -> Router {
    let config = test_config(dir);
    let state = AppState {
        store: Arc::new(JsonFileStore::new(forms_file(dir))),
        catalog: Arc::new(FieldCatalog::default()),
    };
    build_app_router(state, &config)
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
