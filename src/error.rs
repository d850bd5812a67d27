//! Crate-level error type.

use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::transport::TransportError;

/// Errors surfaced while configuring or running the bot.
#[derive(Debug, Error)]
pub enum BotError {
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// URL parse error.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    /// Analysis client error.
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),
    /// Chat transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias for bot operations.
pub type BotResult<T> = Result<T, BotError>;
