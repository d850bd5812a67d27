//! Configuration for the analysis client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BotError, BotResult};

/// Endpoint the analysis service listens on when run locally.
pub const DEFAULT_ANALYSIS_ENDPOINT: &str = "http://127.0.0.1:8000/analyze-symptoms";

/// Analysis client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Full URL of the `analyze-symptoms` endpoint.
    pub endpoint: String,
    /// Upper bound for one analysis call in milliseconds; `None` waits forever.
    pub timeout_ms: Option<u64>,
    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ANALYSIS_ENDPOINT.to_string(),
            timeout_ms: Some(30_000),
            connect_timeout_ms: 5_000,
        }
    }
}

impl AnalysisConfig {
    /// Create a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set or clear the per-call timeout.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_ms = match timeout {
            Some(timeout) => Some(timeout.as_millis() as u64),
            None => None,
        };
        self
    }

    /// Per-call timeout, if bounded.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if the endpoint is not a valid URL or a timeout is zero.
    pub fn validate(&self) -> BotResult<()> {
        Url::parse(&self.endpoint)?;

        if self.timeout_ms == Some(0) {
            return Err(BotError::InvalidConfig(
                "analysis.timeout_ms must be > 0 when set".to_string(),
            ));
        }

        if self.connect_timeout_ms == 0 {
            return Err(BotError::InvalidConfig(
                "analysis.connect_timeout_ms must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}
