//! Greeting cooldown gate.

use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::conversation::ids::ConversationId;

/// Remembers when each conversation was last greeted.
pub struct CooldownGate {
    window: Duration,
    last_greeted: Mutex<LruCache<ConversationId, Instant>>,
}

impl CooldownGate {
    /// Create a gate. With `capacity` set, the least recently seen
    /// conversations are forgotten first (and would be greeted again).
    #[must_use]
    pub fn new(window: Duration, capacity: Option<NonZeroUsize>) -> Self {
        let cache = match capacity {
            Some(capacity) => LruCache::new(capacity),
            None => LruCache::unbounded(),
        };
        Self {
            window,
            last_greeted: Mutex::new(cache),
        }
    }

    /// Decide whether `conversation` should get the instructional reply at `now`.
    ///
    /// Records `now` when it returns `true`.
    pub async fn should_greet(&self, conversation: &ConversationId, now: Instant) -> bool {
        let mut last_greeted = self.last_greeted.lock().await;
        let due = match last_greeted.get(conversation) {
            Some(last) => now.saturating_duration_since(*last) > self.window,
            None => true,
        };
        if due {
            last_greeted.put(conversation.clone(), now);
        }
        due
    }

    /// Number of conversations with a cooldown record.
    pub async fn tracked(&self) -> usize {
        self.last_greeted.lock().await.len()
    }
}
