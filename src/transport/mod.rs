//! Chat transport seam.
//!
//! The transport itself (session pairing, credentials, reconnects) lives in an
//! external bridge. This module only defines what the conversation engine
//! needs from it:
//! - `InboundEvent`: the shape of a delivered message
//! - `ChatTransport`: outbound `send`
//! - `HttpChatTransport`: relay to the bridge over HTTP
//! - `LogTransport`: writes replies to the log for local runs

pub mod error;
pub mod event;
pub mod http;

pub use error::{TransportError, TransportResult};
pub use event::{InboundEvent, OutboundMessage};
pub use http::HttpChatTransport;

use async_trait::async_trait;

use crate::conversation::ids::ConversationId;

/// Outbound half of the chat transport.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Deliver `text` to the conversation. Delivery receipts are not tracked.
    ///
    /// # Errors
    /// Returns an error if the bridge cannot be reached or rejects the message.
    async fn send(&self, conversation: &ConversationId, text: &str) -> TransportResult<()>;
}

/// Transport that only logs replies.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

#[async_trait]
impl ChatTransport for LogTransport {
    async fn send(&self, conversation: &ConversationId, text: &str) -> TransportResult<()> {
        tracing::info!(conversation = %conversation, reply = text, "Outbound reply");
        Ok(())
    }
}
