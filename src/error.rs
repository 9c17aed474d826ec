//! Error types for tester operations.
//!
//! Construction-time misconfiguration (missing credentials, bad base URL) is
//! fatal and returned to the caller. Per-request failures never escape the
//! client boundary: they are caught, logged, and converted into sentinel
//! return values. The variants here give those log lines their shape.

use reqwest::StatusCode;

/// Main error type for the SCIM tester.
#[derive(Debug, thiserror::Error)]
pub enum TesterError {
    /// Invalid or missing configuration detected at construction time
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Transport-level failure (connect, TLS, read)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status. The response body is
    /// carried separately so the client can log it verbatim.
    #[error("Unexpected status {status}")]
    UnexpectedStatus { status: StatusCode, body: String },

    /// Response body could not be parsed as JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Run log file could not be created or written
    #[error("Log I/O error: {0}")]
    LogIo(#[from] std::io::Error),
}

impl TesterError {
    /// Create a configuration error with a custom message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unexpected-status error, keeping the response body.
    pub fn unexpected_status(status: StatusCode, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status,
            body: body.into(),
        }
    }
}

/// Result type alias for tester operations.
pub type TesterResult<T> = Result<T, TesterError>;
