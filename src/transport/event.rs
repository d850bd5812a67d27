//! Message shapes exchanged with the chat transport.

use serde::{Deserialize, Serialize};

use crate::conversation::ids::ConversationId;

/// One inbound message as delivered by the transport bridge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Whether the bot's own account authored the message.
    #[serde(default, alias = "fromSelf")]
    pub from_self: bool,
    /// Chat peer address.
    #[serde(alias = "conversationId")]
    pub conversation_id: String,
    /// Plain-text body; absent for media, reactions and the like.
    #[serde(default)]
    pub text: Option<String>,
}

impl InboundEvent {
    /// A user-authored text message.
    #[must_use]
    pub fn text(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            from_self: false,
            conversation_id: conversation_id.into(),
            text: Some(text.into()),
        }
    }

    /// Conversation identity, or `None` when the address is blank.
    #[must_use]
    pub fn conversation(&self) -> Option<ConversationId> {
        let trimmed = self.conversation_id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(ConversationId::new(trimmed))
        }
    }

    /// Raw text body, or `None` when missing or blank.
    #[must_use]
    pub fn text_body(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Reply handed to the transport bridge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Chat peer address.
    pub conversation_id: String,
    /// Reply text.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snake_and_camel_case() {
        let snake: Result<InboundEvent, _> = serde_json::from_str(
            r#"{"from_self":false,"conversation_id":"5511@s.whatsapp.net","text":"febre"}"#,
        );
        let camel: Result<InboundEvent, _> = serde_json::from_str(
            r#"{"fromSelf":false,"conversationId":"5511@s.whatsapp.net","text":"febre"}"#,
        );
        let expected = InboundEvent::text("5511@s.whatsapp.net", "febre");
        assert_eq!(snake.ok(), Some(expected.clone()));
        assert_eq!(camel.ok(), Some(expected));
    }

    #[test]
    fn test_missing_text_is_none() {
        let event: Result<InboundEvent, _> =
            serde_json::from_str(r#"{"conversation_id":"5511@s.whatsapp.net"}"#);
        let event = event.ok();
        assert_eq!(event.as_ref().map(|e| e.from_self), Some(false));
        assert_eq!(event.as_ref().and_then(InboundEvent::text_body), None);
    }

    #[test]
    fn test_blank_fields_are_rejected() {
        let blank_text = InboundEvent::text("5511@s.whatsapp.net", "   ");
        assert_eq!(blank_text.text_body(), None);

        let blank_id = InboundEvent::text("  ", "febre");
        assert_eq!(blank_id.conversation(), None);
    }

    #[test]
    fn test_text_body_is_not_trimmed() {
        let event = InboundEvent::text("5511@s.whatsapp.net", " dor nas costas ");
        assert_eq!(event.text_body(), Some(" dor nas costas "));
    }
}
