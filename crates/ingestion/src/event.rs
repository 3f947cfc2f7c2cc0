//! Provider webhook payload types.
//!
//! The provider posts `{ "data": { "key": {...}, "pushName": ...,
//! "messageType": ..., "message": {...} } }`. The `message` object carries a
//! differently-shaped payload per message type, so it stays a raw
//! [`serde_json::Value`] with typed accessors on [`EventData`].

use serde::Deserialize;
use serde_json::Value;

/// Envelope of one webhook delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBody {
    pub data: EventData,
}

/// Routing key of a provider message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageKey {
    /// Apparent sender JID (e.g. "5511999998888@s.whatsapp.net").
    #[serde(default)]
    pub remote_jid: String,
    /// True for echoes of our own outbound messages.
    #[serde(default)]
    pub from_me: bool,
    /// Provider-native message id, used for dedup.
    #[serde(default)]
    pub id: String,
    /// Real sender phone when `remote_jid` is a linked-device alias.
    #[serde(default)]
    pub sender_pn: Option<String>,
}

/// One inbound provider event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventData {
    #[serde(default)]
    pub key: MessageKey,
    /// Sender display name, when the provider supplies one.
    #[serde(default)]
    pub push_name: Option<String>,
    /// Provider-declared message type (e.g. "conversation", "imageMessage").
    #[serde(default)]
    pub message_type: String,
    /// Type-specific payload.
    #[serde(default)]
    pub message: Value,
}

impl EventData {
    /// Whether this delivery carries no message content at all
    /// (bare delivery-status updates).
    pub fn is_content_free(&self) -> bool {
        self.message.is_null()
    }

    /// Plain or extended text body, if any.
    pub fn text(&self) -> Option<&str> {
        self.message["conversation"]
            .as_str()
            .or_else(|| self.message["extendedTextMessage"]["text"].as_str())
    }

    /// Caption of the payload under `field` (image/video/document captions).
    pub fn caption(&self, field: &str) -> Option<&str> {
        self.message[field]["caption"].as_str()
    }

    /// Remote media URL of the payload under `field`.
    pub fn media_url(&self, field: &str) -> Option<&str> {
        self.message[field]["url"].as_str().filter(|u| !u.is_empty())
    }

    /// Provider-reported mimetype of the payload under `field`.
    pub fn mimetype(&self, field: &str) -> Option<&str> {
        self.message[field]["mimetype"].as_str()
    }

    /// File name of a document payload.
    pub fn file_name(&self) -> Option<&str> {
        self.message["documentMessage"]["fileName"].as_str()
    }
}
