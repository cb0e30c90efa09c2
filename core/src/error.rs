//! Error types for the DataFair API client.
//!
//! # Design
//! The four statuses callers branch on most (401, 403, 404, 500) get dedicated
//! variants with fixed messages. Any other non-2xx response lands in
//! `Application`, whose message comes from the response body when the server
//! supplied one. Transport failures happen before any response exists and so
//! carry no status code.

use thiserror::Error;

/// Errors returned by `ApiClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 401. The session is missing or expired.
    #[error("Unauthorized – please login")]
    Unauthorized,

    #[error("Forbidden – insufficient permissions")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("Server error")]
    ServerError,

    /// Any other non-2xx status. `message` is the body's `error` field, the
    /// plain-text body, or a generic line naming the status.
    #[error("{message}")]
    Application { status: u16, message: String },

    /// No HTTP response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body did not match the expected shape. `status` is set
    /// when the raw body itself failed to decode.
    #[error("deserialization failed: {message}")]
    Deserialization { status: Option<u16>, message: String },

    /// A successful response lacked the envelope field the caller asked for.
    #[error("response is missing field `{field}`")]
    MissingField { field: String },
}

impl ApiError {
    /// Map a non-success status and its decoded body to an error.
    pub(crate) fn from_status(status: u16, body_error: Option<String>) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            500 => ApiError::ServerError,
            _ => ApiError::Application {
                status,
                message: body_error
                    .unwrap_or_else(|| format!("Request failed with status {status}")),
            },
        }
    }

    /// HTTP status of the response that caused this error, if there was one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::NotFound => Some(404),
            ApiError::ServerError => Some(500),
            ApiError::Application { status, .. } => Some(*status),
            ApiError::Deserialization { status, .. } => *status,
            ApiError::Transport(_) | ApiError::Serialization(_) | ApiError::MissingField { .. } => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Failures that occur before an HTTP response is received.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("transport error: {0}")]
    Other(String),
}
