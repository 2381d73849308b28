//! URL metadata extraction endpoint.

use std::net::Ipv4Addr;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use tracing::instrument;
use url::{Host, Url};
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::routes::ApiState;
use crate::errors::Error;
use crate::services::UrlMetadata;

/// Returned for URLs pointing at loopback, private, or link-local hosts
pub const DISALLOWED_HOST_MESSAGE: &str = "URL host is not allowed";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ExtractMetadataBody {
    #[schema(example = "https://example.com/article")]
    pub url: Option<String>,
}

/// Parse a user-supplied URL, accepting only absolute http(s) URLs whose
/// host is not a loopback, private, or otherwise internal address.
///
/// Only literal IPs and `localhost` names are screened; a public DNS name that
/// resolves to an internal address is not caught here.
fn parse_target(raw: &str) -> crate::Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|_| invalid_url())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid_url());
    }

    match url.host() {
        Some(host) if is_internal_host(&host) => {
            Err(Error::validation_field(DISALLOWED_HOST_MESSAGE, "url"))
        }
        Some(_) => Ok(url),
        None => Err(invalid_url()),
    }
}

fn invalid_url() -> Error {
    Error::validation_field("Invalid URL", "url")
}

fn is_internal_host(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(name) => {
            let name = name.trim_end_matches('.').to_ascii_lowercase();
            name == "localhost" || name.ends_with(".localhost")
        }
        Host::Ipv4(ip) => is_internal_ipv4(ip),
        Host::Ipv6(ip) => match ip.to_ipv4_mapped() {
            Some(mapped) => is_internal_ipv4(&mapped),
            None => {
                let first = ip.segments()[0];
                ip.is_loopback()
                    || ip.is_unspecified()
                    || (first & 0xfe00) == 0xfc00
                    || (first & 0xffc0) == 0xfe80
            }
        },
    }
}

fn is_internal_ipv4(ip: &Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || a == 0
        || (a == 100 && (64..128).contains(&b))
}

#[utoipa::path(
    post,
    path = "/api/urls/extract-metadata",
    request_body = ExtractMetadataBody,
    responses(
        (status = 200, description = "Metadata fetched", body = UrlMetadata),
        (status = 400, description = "Missing, invalid, or internal URL, or malformed body", body = ErrorBody),
        (status = 500, description = "Metadata could not be fetched", body = ErrorBody)
    ),
    tag = "urls"
)]
#[instrument(skip_all)]
pub async fn extract_metadata_handler(
    State(state): State<ApiState>,
    payload: Result<Json<ExtractMetadataBody>, JsonRejection>,
) -> Result<Json<UrlMetadata>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected metadata request body");
        Error::validation("Invalid request body")
    })?;

    let raw = body
        .url
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| Error::validation_field("URL is required", "url"))?;

    let url = parse_target(raw)?;

    let metadata = state.metadata_extractor.extract(&url).await.map_err(|err| {
        tracing::error!(error = %err, url = %url, "Failed to extract metadata");
        ApiError::internal_with("Failed to extract metadata")
    })?;

    Ok(Json(metadata))
}
