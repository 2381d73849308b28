//! # Error Handling
//!
//! Crate-wide error type built with `thiserror`. HTTP handlers translate these
//! into [`crate::api::error::ApiError`] at the boundary; nothing here is shown to
//! clients verbatim.

/// Custom result type for Linkshelf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Linkshelf service
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Database errors that are not connectivity problems
    #[error("Database error: {context}")]
    Database {
        #[source]
        source: sqlx::Error,
        context: String,
    },

    /// The session store could not be reached
    #[error("Session store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// Network transport errors (listener bind, serve loop, outbound HTTP)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Resource not found errors
    #[error("Resource not found: {resource_type} with ID '{id}'")]
    NotFound { resource_type: String, id: String },

    /// Resource conflict errors (e.g., already exists)
    #[error("Resource conflict: {message}")]
    Conflict { message: String, resource_type: String },

    /// Timeout errors
    #[error("Operation timed out: {operation} after {duration_ms}ms")]
    Timeout { operation: String, duration_ms: u64 },

    /// Internal server errors
    #[error("Internal server error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create a session store availability error
    pub fn store_unavailable<S: Into<String>>(message: S) -> Self {
        Self::StoreUnavailable { message: message.into() }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Create a transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport { message: message.into() }
    }

    /// Create a not found error
    pub fn not_found<R: Into<String>, I: Into<String>>(resource_type: R, id: I) -> Self {
        Self::NotFound { resource_type: resource_type.into(), id: id.into() }
    }

    /// Create a conflict error
    pub fn conflict<M: Into<String>, R: Into<String>>(message: M, resource_type: R) -> Self {
        Self::Conflict { message: message.into(), resource_type: resource_type.into() }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S, duration_ms: u64) -> Self {
        Self::Timeout { operation: operation.into(), duration_ms }
    }

    /// Create an internal server error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal { message: message.into(), source: None }
    }

    /// Wrap a database error with context.
    ///
    /// Connectivity failures become [`Error::StoreUnavailable`].
    pub fn database<S: Into<String>>(source: sqlx::Error, context: S) -> Self {
        let context = context.into();
        if is_connectivity_error(&source) {
            return Self::store_unavailable(format!("{}: {}", context, source));
        }
        Self::Database { source, context }
    }

    /// Get the HTTP status code that should be returned for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Config { .. } => 500,
            Error::Database { .. } => 500,
            Error::StoreUnavailable { .. } => 503,
            Error::Io { .. } => 500,
            Error::Serialization { .. } => 400,
            Error::Validation { .. } => 400,
            Error::Transport { .. } => 502,
            Error::NotFound { .. } => 404,
            Error::Conflict { .. } => 409,
            Error::Timeout { .. } => 504,
            Error::Internal { .. } => 500,
        }
    }

    /// Check if this error is a transient failure of an external collaborator.
    ///
    /// Logout treats retryable store errors as best-effort failures and still
    /// reports success; anything else is a fault.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::StoreUnavailable { .. }
                | Error::Timeout { .. }
                | Error::Io { .. }
                | Error::Transport { .. }
        )
    }
}

/// Whether a driver error means the database could not be reached at all.
fn is_connectivity_error(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed
    )
}

impl From<sqlx::Error> for Error {
    fn from(error: sqlx::Error) -> Self {
        if is_connectivity_error(&error) {
            return Self::store_unavailable(error.to_string());
        }
        Self::Database { source: error, context: "Database operation failed".to_string() }
    }
}

impl From<sqlx::migrate::MigrateError> for Error {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        Self::Internal {
            message: "Database migration failed".to_string(),
            source: Some(Box::new(error)),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io { source: error, context: "I/O operation failed".to_string() }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization { source: error, context: "JSON serialization failed".to_string() }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::transport(error.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(format!("Validation failed: {}", message))
    }
}
