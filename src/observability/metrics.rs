//! # Metrics Collection
//!
//! Provides Prometheus metrics collection for the Linkshelf service.

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};
use ::tracing::{info, warn};
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Logout outcomes exported as the `outcome` label
pub const LOGOUT_OUTCOMES: &[&str] =
    &["revoked", "not_found", "no_cookie", "store_failure", "fault"];

/// Metrics recorder that tracks application metrics
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder;

impl MetricsRecorder {
    /// Create a new metrics recorder instance
    pub fn new() -> Self {
        Self
    }

    /// Record an HTTP request
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration: f64) {
        let labels = [
            ("method", method.to_string()),
            ("path", path.to_string()),
            ("status", status.to_string()),
        ];
        counter!("http_requests_total", &labels).increment(1);

        let duration_labels = [("method", method.to_string()), ("path", path.to_string())];
        histogram!("http_request_duration_seconds", &duration_labels).record(duration);
    }

    /// Record a logout by outcome
    pub fn record_logout(&self, outcome: &str) {
        counter!("auth_logouts_total", "outcome" => outcome.to_string()).increment(1);
    }

    /// Record sessions removed by the expiry sweep
    pub fn record_sessions_purged(&self, count: u64) {
        counter!("auth_sessions_purged_total").increment(count);
    }

    /// Record a URL metadata extraction attempt
    pub fn record_metadata_extraction(&self, success: bool, duration: f64) {
        let status = if success { "success" } else { "error" };
        counter!("url_metadata_extractions_total", "status" => status).increment(1);
        histogram!("url_metadata_extraction_duration_seconds").record(duration);
    }

    /// Register baseline auth metrics so Prometheus exports appear before events occur.
    pub fn register_auth_metrics(&self) {
        describe_counter!(
            "auth_logouts_total",
            Unit::Count,
            "Logout requests grouped by outcome"
        );
        describe_counter!(
            "auth_sessions_purged_total",
            Unit::Count,
            "Expired sessions removed by the cleanup sweep"
        );

        for outcome in LOGOUT_OUTCOMES {
            counter!("auth_logouts_total", "outcome" => *outcome).absolute(0);
        }
        counter!("auth_sessions_purged_total").absolute(0);
    }

    /// Register HTTP and metadata extraction metrics
    pub fn register_http_metrics(&self) {
        describe_counter!("http_requests_total", Unit::Count, "HTTP requests served");
        describe_histogram!(
            "http_request_duration_seconds",
            Unit::Seconds,
            "HTTP request latency"
        );
        describe_counter!(
            "url_metadata_extractions_total",
            Unit::Count,
            "URL metadata extractions grouped by status"
        );
        describe_histogram!(
            "url_metadata_extraction_duration_seconds",
            Unit::Seconds,
            "Time spent fetching URL metadata"
        );
    }
}

/// Global metrics recorder instance
static METRICS: once_cell::sync::Lazy<Arc<RwLock<Option<MetricsRecorder>>>> =
    once_cell::sync::Lazy::new(|| Arc::new(RwLock::new(None)));

/// Initialize metrics collection and Prometheus exporter
pub async fn init_metrics(config: &ObservabilityConfig) -> Result<()> {
    let metrics_addr = match config.metrics_bind_address() {
        Some(addr) => addr,
        None => {
            warn!("Metrics disabled: no bind address configured");
            return Ok(());
        }
    };

    let socket_addr: SocketAddr = metrics_addr.parse().map_err(|e| {
        Error::config(format!("Invalid metrics bind address '{}': {}", metrics_addr, e))
    })?;

    let builder = PrometheusBuilder::new()
        .with_http_listener(socket_addr)
        .add_global_label("service", &config.service_name);

    builder
        .install()
        .map_err(|e| Error::config(format!("Failed to initialize metrics exporter: {}", e)))?;

    let recorder = MetricsRecorder::new();
    {
        let mut metrics = METRICS.write().await;
        *metrics = Some(recorder.clone());
    }

    recorder.register_auth_metrics();
    recorder.register_http_metrics();

    info!(
        metrics_addr = %metrics_addr,
        service_name = %config.service_name,
        "Metrics collection initialized"
    );

    Ok(())
}

/// Get the global metrics recorder
pub async fn get_metrics() -> Option<MetricsRecorder> {
    METRICS.read().await.clone()
}

/// Record an HTTP request using the global metrics recorder
pub async fn record_http_request(method: &str, path: &str, status: u16, duration: f64) {
    if let Some(metrics) = get_metrics().await {
        metrics.record_http_request(method, path, status, duration);
    }
}

/// Record a logout outcome via the global recorder
pub async fn record_logout(outcome: &str) {
    if let Some(metrics) = get_metrics().await {
        metrics.record_logout(outcome);
    }
}

/// Record purged sessions via the global recorder
pub async fn record_sessions_purged(count: u64) {
    if let Some(metrics) = get_metrics().await {
        metrics.record_sessions_purged(count);
    }
}

/// Record a metadata extraction via the global recorder
pub async fn record_metadata_extraction(success: bool, duration: f64) {
    if let Some(metrics) = get_metrics().await {
        metrics.record_metadata_extraction(success, duration);
    }
}
