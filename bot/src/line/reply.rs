//! Outbound client for the LINE Messaging API reply endpoint.

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

/// LINE Messaging API reply endpoint.
const REPLY_ENDPOINT: &str = "https://api.line.me/v2/bot/message/reply";

#[derive(Debug, thiserror::Error)]
pub enum LineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("reply API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Client for sending replies. Cheap to clone; the inner `reqwest::Client`
/// is reference-counted and safe for concurrent use.
#[derive(Clone)]
pub struct LineClient {
    http: Client,
    access_token: String,
}

impl LineClient {
    pub fn new(http: Client, access_token: String) -> Self {
        Self { http, access_token }
    }

    /// Send exactly one text message for the given reply token.
    ///
    /// Reply tokens are single use; LINE rejects a second call with the same
    /// token, so callers must never retry a failed reply.
    pub async fn reply(&self, reply_token: &str, text: &str) -> Result<(), LineError> {
        let body = ReplyRequest {
            reply_token,
            messages: vec![ReplyMessage {
                message_type: "text",
                text,
            }],
        };

        debug!(text_length = text.len(), "line_reply_sending");

        let resp = self
            .http
            .post(REPLY_ENDPOINT)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(LineError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// Request body for the reply endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: Vec<ReplyMessage<'a>>,
}

#[derive(Serialize)]
struct ReplyMessage<'a> {
    #[serde(rename = "type")]
    message_type: &'static str,
    text: &'a str,
}
