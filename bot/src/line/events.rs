//! Serde model of the LINE webhook payload.
//!
//! Only text message events are acted on; every other event and message
//! type deserializes into a catch-all variant so unrecognized payloads are
//! skipped instead of failing the whole request.

use serde::Deserialize;

/// Top-level webhook request body: a destination plus zero or more events.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    /// Bot user ID receiving the events
    #[serde(default)]
    pub destination: String,
    /// Events bundled into this delivery
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// A single webhook event, discriminated by its `type` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum WebhookEvent {
    /// A message event (text, sticker, image, ...)
    #[serde(rename = "message")]
    Message(MessageEvent),
    /// Any event type this service does not handle (follow, join, ...)
    #[serde(other)]
    Other,
}

/// A message event carrying the reply token and the message content.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    /// Single-use token for addressing one reply to this event
    #[serde(default)]
    pub reply_token: Option<String>,
    /// Redelivery marker set when LINE retries a delivery
    #[serde(default)]
    pub delivery_context: DeliveryContext,
    /// The message itself
    pub message: MessageContent,
}

/// Delivery context attached to each event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryContext {
    /// True when this event was already delivered once before
    #[serde(default)]
    pub is_redelivery: bool,
}

/// Message content, discriminated by its `type` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum MessageContent {
    /// A plain text message
    #[serde(rename = "text")]
    Text(TextMessageContent),
    /// Stickers, images, and every other message type
    #[serde(other)]
    Other,
}

/// Content of a text message.
#[derive(Debug, Deserialize)]
pub struct TextMessageContent {
    /// Message ID
    #[serde(default)]
    pub id: String,
    /// The user-submitted text
    pub text: String,
}
