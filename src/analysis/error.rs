//! Error types for the analysis client.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while calling the symptom-analysis service.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// The service answered with a non-success status.
    #[error("analysis service returned status {0}")]
    HttpStatus(u16),

    /// Response body was not the expected JSON shape.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Endpoint URL could not be parsed.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// No answer within the configured bound.
    #[error("analysis request timed out after {0:?}")]
    Timeout(Duration),
}

impl AnalysisError {
    /// Whether the failure is likely to go away on its own (network, overload).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest(_) | Self::Timeout(_) => true,
            Self::HttpStatus(status) => *status >= 500,
            Self::HttpClient(_) | Self::JsonParse(_) | Self::InvalidEndpoint(_) => false,
        }
    }
}

/// Convenience result alias for analysis calls.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
