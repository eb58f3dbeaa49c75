//! Integration tests for error responses: status codes, error codes and the
//! `{ "error", "code" }` body shape.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, post_json, put_json};
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: missing form yields 404 NOT_FOUND
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_form_returns_not_found_code() {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(&dir);

    let response = get(app, "/api/v1/forms/42").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Form with id 42 not found");
}

// ---------------------------------------------------------------------------
// Test: validation failures yield 400 VALIDATION_ERROR
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_name_is_validation_error() {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(&dir);

    let response = post_json(app, "/api/v1/forms", json!({"name": "  ", "fields": []})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn non_array_fields_is_validation_error() {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(&dir);

    let response = post_json(
        app,
        "/api/v1/forms",
        json!({"name": "Odd", "fields": "[not an array]"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn duplicate_instance_ids_is_validation_error() {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(&dir);
    let field = json!({"instanceId": "same", "id": "field-1", "label": "A", "type": "text"});

    let response = post_json(
        app,
        "/api/v1/forms",
        json!({"name": "Dupes", "fields": [field.clone(), field]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn invalid_update_leaves_form_untouched() {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(&dir);
    let response = post_json(
        app.clone(),
        "/api/v1/forms",
        json!({"name": "Keep", "fields": []}),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = put_json(
        app.clone(),
        &format!("/api/v1/forms/{id}"),
        json!({"name": "Broken", "fields": [{"label": "no type"}]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(get(app, &format!("/api/v1/forms/{id}")).await).await;
    assert_eq!(json["data"]["name"], "Keep");
}

// ---------------------------------------------------------------------------
// Test: malformed JSON yields 400 BAD_REQUEST with a JSON body
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(&dir);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/forms")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}

// ---------------------------------------------------------------------------
// Test: storage failures are sanitized to 500 INTERNAL_ERROR
// ---------------------------------------------------------------------------

#[tokio::test]
async fn corrupt_store_is_sanitized_internal_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(common::forms_file(&dir), b"{\"forms\": 7}").unwrap();
    let app = common::build_test_app(&dir);

    let response = get(app, "/api/v1/forms").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: unparsable path and query parameters yield the JSON error body
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_numeric_form_id_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(&dir);

    for response in [
        get(app.clone(), "/api/v1/forms/abc").await,
        put_json(app.clone(), "/api/v1/forms/abc", json!({"name": "X"})).await,
        common::delete(app.clone(), "/api/v1/forms/abc").await,
    ] {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST");
        assert!(json["error"].as_str().unwrap().contains("abc"));
    }
}

#[tokio::test]
async fn non_numeric_limit_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(&dir);

    let response = get(app, "/api/v1/forms?limit=lots").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
