//! Per-conversation debounce and aggregation engine.
//!
//! - `cooldown`: greeting throttle per conversation
//! - `debounce`: fragment buffer and restartable flush timers
//! - `flush`: length gate, analysis call and reply formatting
//! - `router`: entry point for inbound events
//! - `replies`: user-facing texts

pub mod config;
pub mod cooldown;
pub mod debounce;
pub mod flush;
pub mod ids;
pub mod replies;
pub mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{
    ConversationConfig, DEFAULT_COOLDOWN_WINDOW, DEFAULT_DEBOUNCE_DELAY,
    DEFAULT_MIN_MESSAGE_CHARS, NO_SYMPTOMS_SENTINEL,
};
pub use cooldown::CooldownGate;
pub use debounce::{Debouncer, FlushBatch, FlushFuture, FlushSink};
pub use flush::{FlushHandler, FlushOutcome};
pub use ids::ConversationId;
pub use router::{ConversationRouter, ConversationStats, RouteOutcome};
