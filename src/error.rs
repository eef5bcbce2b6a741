//! Annotator error types

use std::time::Duration;

/// Annotator error types
#[derive(Debug, thiserror::Error)]
pub enum AnnotatorError {
    // Backend/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("empty response from model")]
    EmptyResponse,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A single labeled case could not be decoded.
    #[error("invalid test case: {0}")]
    InvalidTestCase(String),

    /// The test-case file as a whole could not be loaded.
    #[error("failed to load test cases from {path}: {reason}")]
    TestCases { path: String, reason: String },

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for AnnotatorError {
    fn from(err: reqwest::Error) -> Self {
        AnnotatorError::Http(err.to_string())
    }
}

/// Result type alias for annotator operations
pub type Result<T> = std::result::Result<T, AnnotatorError>;
