//! Timing and validation knobs of the conversation engine.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BotError, BotResult};

/// Minimum interval between two instructional replies to one conversation.
pub const DEFAULT_COOLDOWN_WINDOW: Duration = Duration::from_millis(600_000);
/// Quiet period after the last fragment before a flush.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(5_000);
/// Shortest utterance worth sending for analysis, in characters.
pub const DEFAULT_MIN_MESSAGE_CHARS: usize = 10;
/// Marker the analysis service uses for "no symptoms found".
pub const NO_SYMPTOMS_SENTINEL: &str = "Nenhum";

/// Conversation engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Cooldown between greetings.
    #[serde(with = "crate::config::duration_millis")]
    pub cooldown_window: Duration,
    /// Debounce quiet period.
    #[serde(with = "crate::config::duration_millis")]
    pub debounce_delay: Duration,
    /// Minimum combined utterance length.
    pub min_message_chars: usize,
    /// Sentinel symptom meaning "nothing extracted".
    pub no_symptoms_sentinel: String,
    /// Cap on remembered cooldown records; `None` keeps every conversation.
    pub max_tracked_conversations: Option<usize>,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            cooldown_window: DEFAULT_COOLDOWN_WINDOW,
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
            min_message_chars: DEFAULT_MIN_MESSAGE_CHARS,
            no_symptoms_sentinel: NO_SYMPTOMS_SENTINEL.to_string(),
            max_tracked_conversations: None,
        }
    }
}

impl ConversationConfig {
    /// Create a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the greeting cooldown.
    #[must_use]
    pub const fn with_cooldown_window(mut self, window: Duration) -> Self {
        self.cooldown_window = window;
        self
    }

    /// Set the debounce delay.
    #[must_use]
    pub const fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Set the minimum utterance length.
    #[must_use]
    pub const fn with_min_message_chars(mut self, chars: usize) -> Self {
        self.min_message_chars = chars;
        self
    }

    /// Bound the cooldown store to `max` conversations (LRU eviction).
    #[must_use]
    pub const fn with_max_tracked_conversations(mut self, max: Option<usize>) -> Self {
        self.max_tracked_conversations = max;
        self
    }

    /// Cooldown store capacity, `None` for unbounded.
    #[must_use]
    pub fn cooldown_capacity(&self) -> Option<NonZeroUsize> {
        self.max_tracked_conversations.and_then(NonZeroUsize::new)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> BotResult<()> {
        if self.cooldown_window.is_zero() {
            return Err(BotError::InvalidConfig(
                "conversation.cooldown_window must be > 0".to_string(),
            ));
        }

        if self.debounce_delay.is_zero() {
            return Err(BotError::InvalidConfig(
                "conversation.debounce_delay must be > 0".to_string(),
            ));
        }

        if self.no_symptoms_sentinel.trim().is_empty() {
            return Err(BotError::InvalidConfig(
                "conversation.no_symptoms_sentinel must not be blank".to_string(),
            ));
        }

        if self.max_tracked_conversations == Some(0) {
            return Err(BotError::InvalidConfig(
                "conversation.max_tracked_conversations must be > 0 when set".to_string(),
            ));
        }

        Ok(())
    }
}
