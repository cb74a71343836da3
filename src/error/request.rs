//! REST request errors.

use thiserror::Error;

/// Message used when the server does not supply a `detail`.
pub const GENERIC_REQUEST_FAILURE: &str = "Request failed";

/// Result alias for REST requests.
pub type RequestResult<T> = Result<T, RequestError>;

/// Failures of the JSON request helper.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// The server answered with a non-success status
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// The request never got a response
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The path could not be resolved against the base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The body was not the JSON we expected
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl RequestError {
    /// Build a `RequestFailed` from a status and the server's optional detail.
    pub fn failed(status: u16, detail: Option<String>) -> Self {
        RequestError::RequestFailed {
            status,
            message: detail.unwrap_or_else(|| GENERIC_REQUEST_FAILURE.to_string()),
        }
    }

    /// HTTP status, when the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::RequestFailed { .. } => "E_REQ_FAILED",
            RequestError::Connection(_) => "E_REQ_CONN",
            RequestError::InvalidUrl(_) => "E_REQ_URL",
            RequestError::Decode(_) => "E_REQ_DECODE",
        }
    }
}
