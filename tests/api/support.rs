use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response},
    Router,
};
use axum_extra::extract::cookie::Cookie;
use chrono::{DateTime, Utc};
use linkshelf::{
    api::{build_router, ApiState},
    auth::{Session, SessionToken},
    config::{ApiServerConfig, DatabaseConfig, DeploymentEnvironment, SessionConfig},
    domain::UserId,
    services::{MetadataExtractor, UrlMetadata},
    storage::{create_pool, InMemorySessionStore, SessionStore, SqlxSessionStore},
    Error,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

pub struct TestApp {
    pub state: ApiState,
    pub store: Arc<dyn SessionStore>,
    pub extractor: Arc<StubExtractor>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &ApiServerConfig::default())
    }

    /// Persist a session under a caller-chosen token
    pub async fn seed_session(&self, token: &str) -> Session {
        let now = Utc::now();
        let session = Session {
            token: SessionToken::new(token),
            user_id: UserId::from("user-1"),
            created_at: now,
            expires_at: now + chrono::Duration::hours(1),
        };
        self.store.create(session.clone()).await.expect("seed session");
        session
    }

    pub async fn has_session(&self, token: &str) -> bool {
        self.store.lookup(&SessionToken::new(token)).await.expect("lookup").is_some()
    }
}

fn app_with(store: Arc<dyn SessionStore>, environment: DeploymentEnvironment) -> TestApp {
    let extractor = Arc::new(StubExtractor::default());
    let state =
        ApiState::new(store.clone(), SessionConfig::for_environment(environment), extractor.clone());
    TestApp { state, store, extractor }
}

pub fn setup_test_app() -> TestApp {
    app_with(Arc::new(InMemorySessionStore::new()), DeploymentEnvironment::Development)
}

pub fn setup_production_app() -> TestApp {
    app_with(Arc::new(InMemorySessionStore::new()), DeploymentEnvironment::Production)
}

pub fn setup_app_with_store(store: Arc<dyn SessionStore>) -> TestApp {
    app_with(store, DeploymentEnvironment::Development)
}

pub async fn setup_sqlite_app() -> TestApp {
    let config = DatabaseConfig { url: "sqlite::memory:".to_string(), ..Default::default() };
    let pool = create_pool(&config).await.expect("create sqlite pool");
    app_with(Arc::new(SqlxSessionStore::new(pool)), DeploymentEnvironment::Development)
}

pub async fn send_request(
    app: &TestApp,
    method: Method,
    path: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = if let Some(json) = body {
        let bytes = serde_json::to_vec(&json).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("build request")
    } else {
        builder.body(Body::empty()).expect("build request")
    };

    app.router().oneshot(request).await.expect("request")
}

pub async fn logout(app: &TestApp, cookie: Option<&str>) -> Response<Body> {
    send_request(app, Method::POST, "/api/auth/logout", cookie, None).await
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

/// All `Set-Cookie` headers on a response, parsed
pub fn set_cookies(response: &Response<Body>) -> Vec<Cookie<'static>> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| {
            Cookie::parse(value.to_str().expect("ascii set-cookie").to_string())
                .expect("parse set-cookie")
        })
        .collect()
}

/// Assert the response carries exactly one directive expiring the session cookie
pub fn assert_session_cleared(response: &Response<Body>) -> Cookie<'static> {
    let cookies = set_cookies(response);
    assert_eq!(cookies.len(), 1, "expected exactly one Set-Cookie, got {:?}", cookies);

    let cookie = cookies.into_iter().next().expect("one cookie");
    assert_eq!(cookie.name(), "session");
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(axum_extra::extract::cookie::SameSite::Lax));
    cookie
}

/// Session store whose `delete` always misbehaves
pub enum FailingStore {
    Unavailable,
    TimedOut,
    Fault,
    Panic,
}

#[async_trait]
impl SessionStore for FailingStore {
    async fn create(&self, _session: Session) -> linkshelf::Result<()> {
        Ok(())
    }

    async fn lookup(&self, _token: &SessionToken) -> linkshelf::Result<Option<Session>> {
        Ok(None)
    }

    async fn delete(&self, _token: &SessionToken) -> linkshelf::Result<bool> {
        match self {
            FailingStore::Unavailable => Err(Error::store_unavailable("connection refused")),
            FailingStore::TimedOut => Err(Error::timeout("delete session", 2000)),
            FailingStore::Fault => Err(Error::internal("constraint violated")),
            FailingStore::Panic => panic!("session store crashed"),
        }
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> linkshelf::Result<u64> {
        Ok(0)
    }
}

/// Metadata extractor that answers from memory and counts calls
#[derive(Default)]
pub struct StubExtractor {
    pub fail: std::sync::atomic::AtomicBool,
    calls: AtomicUsize,
}

impl StubExtractor {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataExtractor for StubExtractor {
    async fn extract(&self, url: &Url) -> linkshelf::Result<UrlMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::transport("upstream unreachable"));
        }
        Ok(UrlMetadata {
            url: url.to_string(),
            resolved_url: url.to_string(),
            status_code: 200,
            content_type: Some("text/html".to_string()),
            content_length: Some(1024),
            fetched_at: Utc::now(),
        })
    }
}
