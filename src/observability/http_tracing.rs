//! # HTTP Request Metrics Middleware
//!
//! Axum middleware recording request counts and latency for Prometheus.
//! Request spans come from tower-http's `TraceLayer`.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use super::metrics;

/// Axum middleware that records per-request metrics
pub async fn track_http_requests(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = normalize_path_for_metrics(request.uri().path());
    let start = Instant::now();

    let response = next.run(request).await;

    let status_code = response.status().as_u16();
    let elapsed = start.elapsed();

    tracing::debug!(
        method = %method,
        path = %path,
        status_code = status_code,
        elapsed_ms = elapsed.as_millis() as u64,
        "HTTP request completed"
    );

    metrics::record_http_request(&method, &path, status_code, elapsed.as_secs_f64()).await;

    response
}

/// Normalize path for metrics to avoid high cardinality.
///
/// Known routes are kept verbatim; anything else is collapsed so scanners
/// cannot mint new label values.
fn normalize_path_for_metrics(path: &str) -> String {
    const KNOWN_ROUTES: &[&str] = &[
        "/health",
        "/api/auth/logout",
        "/api/urls/extract-metadata",
        "/api/docs/openapi.json",
    ];

    let trimmed = if path.len() > 1 { path.trim_end_matches('/') } else { path };
    if KNOWN_ROUTES.contains(&trimmed) {
        trimmed.to_string()
    } else {
        "unmatched".to_string()
    }
}
