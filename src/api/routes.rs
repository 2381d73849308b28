use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{ApiServerConfig, SessionConfig};
use crate::observability::track_http_requests;
use crate::services::MetadataExtractor;
use crate::storage::SessionStore;

use super::{
    docs,
    handlers::{extract_metadata_handler, health_handler, logout_handler},
};

/// Shared handler state. Cloned per request; holds `Arc`s only.
#[derive(Clone)]
pub struct ApiState {
    pub session_store: Arc<dyn SessionStore>,
    pub session_config: Arc<SessionConfig>,
    pub metadata_extractor: Arc<dyn MetadataExtractor>,
}

impl ApiState {
    pub fn new(
        session_store: Arc<dyn SessionStore>,
        session_config: SessionConfig,
        metadata_extractor: Arc<dyn MetadataExtractor>,
    ) -> Self {
        Self { session_store, session_config: Arc::new(session_config), metadata_extractor }
    }
}

pub fn build_router(state: ApiState, config: &ApiServerConfig) -> Router {
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/docs/openapi.json", get(docs::openapi_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/urls/extract-metadata", post(extract_metadata_handler))
        .with_state(state)
        .layer(middleware::from_fn(track_http_requests))
        .layer(TraceLayer::new_for_http());

    match cors_layer(&config.cors_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// Credentialed CORS for the configured origins; `None` when no origin is usable
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}
