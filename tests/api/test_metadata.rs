//! Integration tests for `POST /api/urls/extract-metadata`

use std::sync::atomic::Ordering;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use axum_test::TestServer;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::support::{read_json, send_request, setup_test_app};

#[tokio::test]
async fn extracts_metadata_for_valid_url() {
    let app = setup_test_app();
    let server = TestServer::new(app.router()).expect("test server");

    let response = server
        .post("/api/urls/extract-metadata")
        .json(&json!({ "url": "https://example.com/a" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["url"], "https://example.com/a");
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["contentType"], "text/html");
    assert_eq!(app.extractor.calls(), 1);
}

#[tokio::test]
async fn missing_or_blank_url_is_rejected() {
    let app = setup_test_app();
    let server = TestServer::new(app.router()).expect("test server");

    let payloads = [json!({}), json!({ "url": "" }), json!({ "url": "   " }), json!({ "url": null })];
    for payload in payloads {
        let response = server.post("/api/urls/extract-metadata").json(&payload).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "URL is required" }));
    }
    assert_eq!(app.extractor.calls(), 0);
}

#[tokio::test]
async fn non_http_url_is_rejected() {
    let app = setup_test_app();
    let server = TestServer::new(app.router()).expect("test server");

    for url in ["not a url", "ftp://example.com/file", "/relative"] {
        let response =
            server.post("/api/urls/extract-metadata").json(&json!({ "url": url })).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Invalid URL" }));
    }
    assert_eq!(app.extractor.calls(), 0);
}

#[tokio::test]
async fn internal_hosts_are_rejected_before_fetching() {
    let app = setup_test_app();
    let server = TestServer::new(app.router()).expect("test server");

    for url in [
        "http://127.0.0.1:8080/admin",
        "http://localhost/",
        "http://169.254.169.254/latest/meta-data/",
        "http://[::1]/",
    ] {
        let response =
            server.post("/api/urls/extract-metadata").json(&json!({ "url": url })).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "URL host is not allowed" }));
    }
    assert_eq!(app.extractor.calls(), 0);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = setup_test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/urls/extract-metadata")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("build request");
    let response = app.router().oneshot(request).await.expect("request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_json(response).await;
    assert_eq!(body, json!({ "error": "Invalid request body" }));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/urls/extract-metadata")
        .body(Body::from("url=https://example.com"))
        .expect("build request");
    let response = app.router().oneshot(request).await.expect("request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn extractor_failure_is_internal_error() {
    let app = setup_test_app();
    app.extractor.fail.store(true, Ordering::SeqCst);

    let response = send_request(
        &app,
        Method::POST,
        "/api/urls/extract-metadata",
        None,
        Some(json!({ "url": "https://example.com" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = read_json(response).await;
    assert_eq!(body, json!({ "error": "Failed to extract metadata" }));
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = setup_test_app();
    let server = TestServer::new(app.router()).expect("test server");

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok" }));

    let response = server.get("/api/docs/openapi.json").await;
    response.assert_status_ok();
    let document: Value = response.json();
    assert!(document["paths"]["/api/auth/logout"]["post"].is_object());
    assert!(document["paths"]["/api/urls/extract-metadata"]["post"].is_object());
}
