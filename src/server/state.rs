//! Application state shared across all request handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::conversation::ConversationRouter;

/// Shared application state.
pub struct AppState {
    /// Conversation engine receiving inbound events.
    pub router: Arc<ConversationRouter>,
    /// When the gateway was started.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(router: Arc<ConversationRouter>) -> Arc<Self> {
        Arc::new(Self {
            router,
            started_at: Utc::now(),
        })
    }

    /// Whole seconds since start.
    #[must_use]
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }
}
