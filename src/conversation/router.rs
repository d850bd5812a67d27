//! Entry point for inbound message events.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::analysis::SymptomAnalyzer;
use crate::conversation::config::ConversationConfig;
use crate::conversation::cooldown::CooldownGate;
use crate::conversation::debounce::{Debouncer, FlushSink};
use crate::conversation::flush::FlushHandler;
use crate::conversation::ids::ConversationId;
use crate::conversation::replies;
use crate::error::BotResult;
use crate::transport::{ChatTransport, InboundEvent};

/// What the router did with an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RouteOutcome {
    /// Authored by the bot itself.
    IgnoredSelf,
    /// No usable text body or conversation address.
    IgnoredNonText,
    /// Instructional reply sent; the text was discarded.
    Greeted,
    /// Text buffered for the next flush.
    Buffered {
        /// Fragments now waiting for this conversation.
        pending: usize,
    },
}

/// Point-in-time counters of the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversationStats {
    /// Conversations with a cooldown record.
    pub tracked_conversations: usize,
    /// Conversations with a buffer awaiting flush.
    pub pending_conversations: usize,
    /// Flushes waiting on the analysis service or the transport.
    pub in_flight_flushes: usize,
}

/// Owns all per-conversation state and dispatches inbound events.
pub struct ConversationRouter {
    cooldown: CooldownGate,
    debouncer: Debouncer,
    transport: Arc<dyn ChatTransport>,
}

impl ConversationRouter {
    /// Build the router with its cooldown gate, debouncer and flush handler.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(
        config: &ConversationConfig,
        analyzer: Arc<dyn SymptomAnalyzer>,
        transport: Arc<dyn ChatTransport>,
        analysis_timeout: Option<Duration>,
    ) -> BotResult<Self> {
        config.validate()?;

        let handler: Arc<dyn FlushSink> = Arc::new(FlushHandler::new(
            config,
            analyzer,
            Arc::clone(&transport),
            analysis_timeout,
        ));

        Ok(Self {
            cooldown: CooldownGate::new(config.cooldown_window, config.cooldown_capacity()),
            debouncer: Debouncer::new(config.debounce_delay, handler),
            transport,
        })
    }

    /// Route one inbound event.
    pub async fn on_inbound_message(&self, event: InboundEvent) -> RouteOutcome {
        if event.from_self {
            return RouteOutcome::IgnoredSelf;
        }

        let (Some(conversation), Some(text)) = (event.conversation(), event.text_body()) else {
            debug!(conversation = %event.conversation_id, "Ignoring event without text");
            return RouteOutcome::IgnoredNonText;
        };

        if self.cooldown.should_greet(&conversation, Instant::now()).await {
            info!(conversation = %conversation, "Sending instructions");
            if let Err(err) = self.transport.send(&conversation, replies::GREETING).await {
                warn!(conversation = %conversation, ?err, "Failed to send instructions");
            }
            return RouteOutcome::Greeted;
        }

        let pending = self.debouncer.on_fragment(conversation, text);
        RouteOutcome::Buffered { pending }
    }

    /// Flush one conversation now instead of waiting for the quiet period.
    pub async fn flush(&self, conversation: &ConversationId) -> bool {
        self.debouncer.flush_now(conversation).await
    }

    /// Flush every pending buffer and wait for flushes already running; used
    /// on shutdown.
    pub async fn drain(&self) -> usize {
        let flushed = self.debouncer.flush_all().await;
        if flushed > 0 {
            info!(flushed, "Drained pending conversations");
        }
        flushed
    }

    /// Current engine counters.
    pub async fn stats(&self) -> ConversationStats {
        ConversationStats {
            tracked_conversations: self.cooldown.tracked().await,
            pending_conversations: self.debouncer.pending_conversations(),
            in_flight_flushes: self.debouncer.in_flight(),
        }
    }
}
