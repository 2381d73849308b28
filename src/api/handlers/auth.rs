//! Session termination endpoint.

use std::panic::AssertUnwindSafe;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::routes::ApiState;
use crate::auth::session::{removal_cookie, SessionToken};
use crate::errors::Error;
use crate::observability::metrics;
use crate::storage::SessionStore;

pub const LOGOUT_SUCCESS_MESSAGE: &str = "Logged out successfully";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    #[schema(example = "Logged out successfully")]
    pub message: String,
}

/// How the server-side half of a logout ended.
///
/// Every variant still answers 200; only a [`LogoutFault`] produces a 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// The session record was deleted
    Revoked,
    /// The cookie named a session the store did not know
    NotFound,
    /// The request carried no session cookie
    NoCookie,
    /// The store could not be reached; the record may survive until it expires
    StoreFailure,
}

impl LogoutOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogoutOutcome::Revoked => "revoked",
            LogoutOutcome::NotFound => "not_found",
            LogoutOutcome::NoCookie => "no_cookie",
            LogoutOutcome::StoreFailure => "store_failure",
        }
    }
}

/// Unexpected failure while revoking a session
#[derive(Debug, thiserror::Error)]
pub enum LogoutFault {
    #[error("session store fault: {0}")]
    Store(#[source] Error),

    #[error("session store panicked: {0}")]
    Panic(String),
}

/// Delete the session named by `token`, classifying the result.
///
/// Retryable store errors are swallowed as [`LogoutOutcome::StoreFailure`].
/// Non-retryable errors and panics inside the store become a [`LogoutFault`].
pub async fn revoke_session(
    store: &dyn SessionStore,
    token: Option<SessionToken>,
) -> Result<LogoutOutcome, LogoutFault> {
    let Some(token) = token else {
        return Ok(LogoutOutcome::NoCookie);
    };

    let attempt = AssertUnwindSafe(async { store.delete(&token).await }).catch_unwind().await;

    match attempt {
        Ok(Ok(true)) => Ok(LogoutOutcome::Revoked),
        Ok(Ok(false)) => Ok(LogoutOutcome::NotFound),
        Ok(Err(err)) if err.is_retryable() => {
            tracing::warn!(error = %err, "Session store unavailable during logout; clearing cookie anyway");
            Ok(LogoutOutcome::StoreFailure)
        }
        Ok(Err(err)) => Err(LogoutFault::Store(err)),
        Err(payload) => Err(LogoutFault::Panic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session terminated; the session cookie is cleared", body = LogoutResponse,
         headers(
             ("Set-Cookie" = String, description = "Expired session cookie (Max-Age=0)")
         )
        ),
        (status = 500, description = "Unexpected failure; the session cookie is still cleared", body = ErrorBody)
    ),
    tag = "auth"
)]
#[instrument(skip_all, fields(outcome = tracing::field::Empty))]
pub async fn logout_handler(State(state): State<ApiState>, jar: CookieJar) -> Response {
    let token = SessionToken::from_jar(&jar);
    let jar = jar.add(removal_cookie(&state.session_config));

    match revoke_session(state.session_store.as_ref(), token).await {
        Ok(outcome) => {
            tracing::Span::current().record("outcome", outcome.as_str());
            match outcome {
                LogoutOutcome::Revoked => tracing::info!("Session revoked"),
                LogoutOutcome::NotFound => tracing::info!("Logout for unknown session"),
                LogoutOutcome::NoCookie => tracing::debug!("Logout without session cookie"),
                LogoutOutcome::StoreFailure => {}
            }
            metrics::record_logout(outcome.as_str()).await;

            let body = LogoutResponse { message: LOGOUT_SUCCESS_MESSAGE.to_string() };
            (StatusCode::OK, jar, Json(body)).into_response()
        }
        Err(fault) => {
            tracing::Span::current().record("outcome", "fault");
            tracing::error!(error = %fault, "Logout failed");
            metrics::record_logout("fault").await;

            (jar, ApiError::internal()).into_response()
        }
    }
}
