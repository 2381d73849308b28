//! URL metadata extraction.
//!
//! [`MetadataExtractor`] is the collaborator behind `POST /api/urls/extract-metadata`.
//! The HTTP implementation reports transport-level facts only; the body is
//! never parsed.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

use crate::config::MetadataConfig;
use crate::errors::{Error, Result};
use crate::observability::metrics;

const MAX_REDIRECTS: usize = 10;

/// Facts gathered from fetching a URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UrlMetadata {
    /// URL as submitted
    pub url: String,
    /// URL after following redirects
    pub resolved_url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub fetched_at: DateTime<Utc>,
}

#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn extract(&self, url: &Url) -> Result<UrlMetadata>;
}

/// Fetches metadata with a single bounded GET request
#[derive(Debug, Clone)]
pub struct HttpMetadataExtractor {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpMetadataExtractor {
    pub fn new(config: &MetadataConfig) -> Result<Self> {
        Self::with_timeout(config.timeout(), &config.user_agent)
    }

    pub fn with_timeout(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    async fn fetch(&self, url: &Url) -> Result<UrlMetadata> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(format!("fetch {}", url), self.timeout.as_millis() as u64)
            } else {
                Error::from(e)
            }
        })?;

        let headers = response.headers();
        let content_type =
            headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()).map(|v| v.to_string());
        let content_length = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        Ok(UrlMetadata {
            url: url.to_string(),
            resolved_url: response.url().to_string(),
            status_code: response.status().as_u16(),
            content_type,
            content_length,
            fetched_at: Utc::now(),
        })
    }
}

#[async_trait]
impl MetadataExtractor for HttpMetadataExtractor {
    #[tracing::instrument(skip_all, fields(host = url.host_str().unwrap_or_default()))]
    async fn extract(&self, url: &Url) -> Result<UrlMetadata> {
        let start = Instant::now();
        let result = self.fetch(url).await;
        metrics::record_metadata_extraction(result.is_ok(), start.elapsed().as_secs_f64()).await;

        match &result {
            Ok(metadata) => tracing::debug!(
                status_code = metadata.status_code,
                resolved_url = %metadata.resolved_url,
                "Fetched URL metadata"
            ),
            Err(err) => tracing::debug!(error = %err, "URL metadata fetch failed"),
        }

        result
    }
}
