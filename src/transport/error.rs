//! Error types for chat transport adapters.

use thiserror::Error;

/// Errors raised while delivering an outbound reply.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// The relay answered with a non-success status.
    #[error("relay returned status {0}")]
    HttpStatus(u16),

    /// Relay URL could not be parsed.
    #[error("Invalid relay URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

/// Convenience result alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
