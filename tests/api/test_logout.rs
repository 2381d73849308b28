//! Integration tests for `POST /api/auth/logout`

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::support::{
    assert_session_cleared, logout, read_json, setup_app_with_store, setup_production_app,
    setup_sqlite_app, setup_test_app, FailingStore,
};

#[tokio::test]
async fn logout_revokes_existing_session() {
    let app = setup_test_app();
    app.seed_session("abc123").await;

    let response = logout(&app, Some("session=abc123")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_session_cleared(&response);
    let body: Value = read_json(response).await;
    assert_eq!(body, json!({ "message": "Logged out successfully" }));
    assert!(!app.has_session("abc123").await);
}

#[tokio::test]
async fn logout_without_cookie_succeeds_and_leaves_store_untouched() {
    let app = setup_test_app();
    app.seed_session("other-session").await;

    let response = logout(&app, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_session_cleared(&response);
    let body: Value = read_json(response).await;
    assert_eq!(body["message"], "Logged out successfully");
    assert!(app.has_session("other-session").await);
}

#[tokio::test]
async fn logout_with_empty_cookie_is_treated_as_no_cookie() {
    let app = setup_app_with_store(Arc::new(FailingStore::Panic));

    let response = logout(&app, Some("session=")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_session_cleared(&response);
}

#[tokio::test]
async fn logout_only_revokes_the_presented_session() {
    let app = setup_test_app();
    app.seed_session("mine").await;
    app.seed_session("someone-else").await;

    let response = logout(&app, Some("theme=dark; session=mine")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!app.has_session("mine").await);
    assert!(app.has_session("someone-else").await);
}

#[tokio::test]
async fn logout_is_idempotent() {
    let app = setup_test_app();
    app.seed_session("abc123").await;

    let first = logout(&app, Some("session=abc123")).await;
    let second = logout(&app, Some("session=abc123")).await;

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    assert_session_cleared(&first);
    assert_session_cleared(&second);
    let body: Value = read_json(second).await;
    assert_eq!(body["message"], "Logged out successfully");
}

#[tokio::test]
async fn logout_with_unknown_session_succeeds() {
    let app = setup_test_app();

    let response = logout(&app, Some("session=never-issued")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_session_cleared(&response);
}

#[tokio::test]
async fn clearing_cookie_is_secure_in_production_only() {
    let production = setup_production_app();
    let response = logout(&production, Some("session=abc123")).await;
    let cookie = assert_session_cleared(&response);
    assert_eq!(cookie.secure(), Some(true));

    let development = setup_test_app();
    let response = logout(&development, Some("session=abc123")).await;
    let cookie = assert_session_cleared(&response);
    assert_ne!(cookie.secure(), Some(true));
}

#[tokio::test]
async fn unavailable_store_still_reports_success() {
    for store in [FailingStore::Unavailable, FailingStore::TimedOut] {
        let app = setup_app_with_store(Arc::new(store));

        let response = logout(&app, Some("session=abc123")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_session_cleared(&response);
        let body: Value = read_json(response).await;
        assert_eq!(body["message"], "Logged out successfully");
    }
}

#[tokio::test]
async fn store_panic_returns_internal_error() {
    let app = setup_app_with_store(Arc::new(FailingStore::Panic));

    let response = logout(&app, Some("session=abc123")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_session_cleared(&response);
    let body: Value = read_json(response).await;
    assert_eq!(body, json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn store_fault_returns_internal_error_without_detail() {
    let app = setup_app_with_store(Arc::new(FailingStore::Fault));

    let response = logout(&app, Some("session=abc123")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_session_cleared(&response);
    let body: Value = read_json(response).await;
    assert_eq!(body, json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn logout_revokes_sqlite_backed_session() {
    let app = setup_sqlite_app().await;
    app.seed_session("abc123").await;
    assert!(app.has_session("abc123").await);

    let response = logout(&app, Some("session=abc123")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_session_cleared(&response);
    assert!(!app.has_session("abc123").await);
}

#[tokio::test]
async fn concurrent_logouts_for_same_session_all_succeed() {
    let app = Arc::new(setup_test_app());
    app.seed_session("shared").await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let response = logout(&app, Some("session=shared")).await;
            assert_session_cleared(&response);
            response.status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.expect("join"), StatusCode::OK);
    }
    assert!(!app.has_session("shared").await);
}

#[tokio::test]
async fn logout_rejects_other_methods() {
    let app = setup_test_app();

    let response = crate::support::send_request(
        &app,
        axum::http::Method::GET,
        "/api/auth/logout",
        Some("session=abc123"),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
