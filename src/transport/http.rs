//! HTTP relay transport: POSTs replies to the chat bridge.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::conversation::ids::ConversationId;
use crate::transport::error::{TransportError, TransportResult};
use crate::transport::event::OutboundMessage;
use crate::transport::ChatTransport;

/// Sends every reply as `{ conversation_id, text }` to a bridge endpoint.
pub struct HttpChatTransport {
    client: Client,
    endpoint: Url,
}

impl HttpChatTransport {
    /// Create a relay transport.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the client cannot be built.
    pub fn new(endpoint: &str, timeout: Duration) -> TransportResult<Self> {
        let endpoint = Url::parse(endpoint)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::HttpClient(e.to_string()))?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, conversation: &ConversationId, text: &str) -> TransportResult<()> {
        let body = OutboundMessage {
            conversation_id: conversation.as_str().to_owned(),
            text: text.to_string(),
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status.as_u16()));
        }
        Ok(())
    }
}
