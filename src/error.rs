//! Error types for the rollover replay.

use reqwest::StatusCode;

/// Errors raised while reading the log or talking to Okapi.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// Reading the rollover log failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failure (connect, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Okapi answered with a status >= 400.
    #[error("{method} {path} returned {status}: {body}")]
    Status {
        method: &'static str,
        path: String,
        status: StatusCode,
        body: String,
    },

    /// Login succeeded but the response carried no token header.
    #[error("Login response did not include an x-okapi-token header")]
    MissingToken,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ReplayError {
    /// HTTP status of a rejected request, if that is what this error is.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ReplayError::Status { status, .. } => Some(*status),
            ReplayError::Http(err) => err.status(),
            _ => None,
        }
    }
}

/// Why a failure line could not be turned into an order line.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("No JSON object found on line")]
    NoObject,

    #[error("Invalid JSON: {blob}")]
    InvalidJson {
        blob: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON object has no usable id: {blob}")]
    MissingId { blob: String },
}
