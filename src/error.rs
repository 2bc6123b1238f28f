//! Error types with HTTP status code mapping.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

/// Error type for paddock operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Domain errors
    /// Invalid input to a role or user mutation (e.g. an empty role name).
    /// Recovered locally by the caller — never fatal.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A mutation refused because of live references (e.g. deleting a role
    /// still assigned to a user). No partial mutation occurs.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Optimistic-concurrency rejection: the caller edited an older snapshot
    /// of the shared configuration.
    #[error("Stale configuration: expected version {expected}, found {found}")]
    StaleConfig { expected: u64, found: u64 },

    #[error("Forbidden: cannot {action} {resource}")]
    Forbidden { resource: String, action: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Too many requests, retry after {retry_after}s")]
    TooManyRequests { retry_after: u64 },

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // System errors
    #[error("Invalid address: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::BadRequest(_) | Error::AddrParse(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) | Error::StaleConfig { .. } => StatusCode::CONFLICT,
            Error::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,

            // Config errors -> 500 (shouldn't happen at runtime)
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // System errors -> 500
            Error::Io(_) | Error::Json(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Convert error into HTTP response.
    ///
    /// Server-error payloads are replaced with a generic message so IO paths,
    /// JSON parser context, and other internals never reach the client.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!("Internal error: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = serde_json::json!({
            "error": message
        });

        let mut builder = Response::builder()
            .status(status)
            .header("Content-Type", "application/json");
        if let Error::TooManyRequests { retry_after } = &self {
            builder = builder.header("Retry-After", retry_after.to_string());
        }
        builder
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }
}

/// Result type alias using paddock's Error.
pub type Result<T> = std::result::Result<T, Error>;
