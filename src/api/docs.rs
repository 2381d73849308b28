use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Linkshelf API"),
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::auth::logout_handler,
        crate::api::handlers::urls::extract_metadata_handler
    ),
    components(
        schemas(
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::auth::LogoutResponse,
            crate::api::handlers::urls::ExtractMetadataBody,
            crate::api::error::ErrorBody,
            crate::services::UrlMetadata
        )
    ),
    tags(
        (name = "auth", description = "Session termination"),
        (name = "urls", description = "Link metadata"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Serve the generated OpenAPI document
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
