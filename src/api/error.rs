use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::Error;

/// Generic message for faults; details stay in the server log
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The opaque 500 used whenever a fault must not leak detail
    pub fn internal() -> Self {
        ApiError::Internal(INTERNAL_ERROR_MESSAGE.to_string())
    }

    pub fn internal_with<S: Into<String>>(msg: S) -> Self {
        ApiError::Internal(msg.into())
    }
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Internal server error")]
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        let message = match self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg,
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation { message, .. } => ApiError::BadRequest(message),
            other => {
                tracing::error!(error = %other, "Unhandled error at API boundary");
                ApiError::internal()
            }
        }
    }
}
