//! Process configuration assembled from `TRIAGE_*` environment variables.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::analysis::AnalysisConfig;
use crate::conversation::ConversationConfig;
use crate::error::{BotError, BotResult};

/// Default gateway port.
pub const DEFAULT_PORT: u16 = 3000;

/// Top-level configuration of the bot process.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BotConfig {
    /// Debounce, cooldown and validation settings.
    pub conversation: ConversationConfig,
    /// Analysis service settings.
    pub analysis: AnalysisConfig,
    /// Outbound transport settings.
    pub transport: TransportConfig,
    /// Webhook gateway settings.
    pub server: ServerConfig,
}

/// Outbound transport settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Relay endpoint for replies; replies are only logged when unset.
    pub outbound_url: Option<String>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            outbound_url: None,
            timeout_ms: 10_000,
        }
    }
}

impl TransportConfig {
    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Webhook gateway settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// TCP port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

impl BotConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error if a variable cannot be parsed or the result is invalid.
    pub fn from_env() -> BotResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns an error if a value cannot be parsed or the result is invalid.
    pub fn from_lookup<F>(lookup: F) -> BotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = parse_var(&lookup, "TRIAGE_PORT")? {
            config.server.port = port;
        }
        if let Some(endpoint) = lookup("TRIAGE_ANALYSIS_URL") {
            config.analysis.endpoint = endpoint;
        }
        if let Some(timeout_ms) = parse_var::<u64, _>(&lookup, "TRIAGE_ANALYSIS_TIMEOUT_MS")? {
            config.analysis.timeout_ms = (timeout_ms > 0).then_some(timeout_ms);
        }
        if let Some(outbound) = lookup("TRIAGE_OUTBOUND_URL") {
            config.transport.outbound_url = Some(outbound).filter(|url| !url.trim().is_empty());
        }
        if let Some(ms) = parse_var(&lookup, "TRIAGE_COOLDOWN_MS")? {
            config.conversation.cooldown_window = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var(&lookup, "TRIAGE_DEBOUNCE_MS")? {
            config.conversation.debounce_delay = Duration::from_millis(ms);
        }
        if let Some(chars) = parse_var(&lookup, "TRIAGE_MIN_MESSAGE_CHARS")? {
            config.conversation.min_message_chars = chars;
        }
        if let Some(max) = parse_var(&lookup, "TRIAGE_MAX_TRACKED_CONVERSATIONS")? {
            config.conversation.max_tracked_conversations = Some(max);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any section is invalid.
    pub fn validate(&self) -> BotResult<()> {
        self.conversation.validate()?;
        self.analysis.validate()?;

        if let Some(url) = &self.transport.outbound_url {
            Url::parse(url)?;
        }
        if self.transport.timeout_ms == 0 {
            return Err(BotError::InvalidConfig(
                "transport.timeout_ms must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> BotResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| BotError::InvalidConfig(format!("{key}={raw:?}: {e}")))
        })
        .transpose()
}

/// Serde module for Duration serialization as whole milliseconds.
pub(crate) mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
