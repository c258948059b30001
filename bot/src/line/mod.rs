//! LINE platform integration: webhook payload model and reply client.

pub mod events;
pub mod reply;

pub use events::{
    DeliveryContext, MessageContent, MessageEvent, TextMessageContent, WebhookEvent,
    WebhookPayload,
};
pub use reply::{LineClient, LineError};
