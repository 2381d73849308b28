//! End-to-end: a real listener and a cookie-keeping HTTP client.

use std::sync::Arc;

use axum::http::StatusCode;
use linkshelf::{
    api::{build_router, serve},
    config::ApiServerConfig,
};
use reqwest::cookie::{CookieStore, Jar};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use url::Url;

use crate::support::setup_test_app;

#[tokio::test]
async fn browser_drops_session_cookie_after_logout() {
    let app = setup_test_app();
    app.seed_session("abc123").await;

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let router = build_router(app.state.clone(), &ApiServerConfig::default());
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(serve(listener, router, async move {
        let _ = shutdown_rx.await;
    }));

    let base = Url::parse(&format!("http://{}/", addr)).expect("base url");
    let jar = Arc::new(Jar::default());
    jar.add_cookie_str("session=abc123; Path=/", &base);
    let client = reqwest::Client::builder()
        .cookie_provider(jar.clone())
        .build()
        .expect("client");

    let response = client
        .post(base.join("api/auth/logout").expect("logout url"))
        .send()
        .await
        .expect("logout request");

    assert_eq!(response.status().as_u16(), StatusCode::OK.as_u16());
    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["message"], "Logged out successfully");

    assert!(!app.has_session("abc123").await);
    let remaining = jar.cookies(&base);
    let still_has_session = remaining
        .as_ref()
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(';').any(|pair| pair.trim().starts_with("session=")))
        .unwrap_or(false);
    assert!(!still_has_session, "session cookie should be gone: {:?}", remaining);

    shutdown_tx.send(()).expect("signal shutdown");
    server.await.expect("join").expect("server exits cleanly");
}
