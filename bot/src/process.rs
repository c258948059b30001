//! Webhook event processing.
//!
//! This module turns a verified webhook body into zero or more replies.
//!
//! ## Processing Flow
//!
//! ```text
//! raw body → WebhookPayload → correction_reply() per event → LINE reply API
//! ```
//!
//! Failures past parsing never abort the batch: one event failing to reply
//! must not starve the remaining events of their single-use reply tokens.

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::checker::{GrammarChecker, NO_CORRECTIONS};
use crate::line::{LineClient, MessageContent, MessageEvent, WebhookEvent, WebhookPayload};

/// Process one verified webhook delivery.
///
/// Parses the payload and handles each event in arrival order. Returns an
/// error only when the body is not a valid webhook payload; per-event
/// failures are logged and swallowed.
pub async fn process_webhook(
    checker: &GrammarChecker,
    line: &LineClient,
    body: &[u8],
) -> Result<()> {
    let payload: WebhookPayload =
        serde_json::from_slice(body).context("Failed to parse webhook payload")?;

    info!(
        destination = %payload.destination,
        events = payload.events.len(),
        "line_webhook_process_start"
    );

    for event in payload.events {
        match event {
            WebhookEvent::Message(message) => handle_message_event(checker, line, message).await,
            WebhookEvent::Other => debug!("line_event_skipped"),
        }
    }

    Ok(())
}

/// Handle a single message event end to end.
async fn handle_message_event(checker: &GrammarChecker, line: &LineClient, event: MessageEvent) {
    let Some(reply_token) = event.reply_token.clone() else {
        warn!("line_reply_token_missing");
        return;
    };

    let Some(reply) = correction_reply(checker, &event).await else {
        return;
    };

    match line.reply(&reply_token, &reply).await {
        Ok(()) => info!(reply_length = reply.len(), "line_reply_sent"),
        Err(e) => error!(error = %e, "line_reply_failed"),
    }
}

/// Decide the reply text for one message event, if any.
///
/// Returns `None` for every case that must not produce a reply: redelivered
/// events, non-text messages, an empty model response, and a response equal
/// to the no-corrections sentinel. Redeliveries and non-text messages are
/// rejected before the model call so retries cannot run up generation cost.
async fn correction_reply(checker: &GrammarChecker, event: &MessageEvent) -> Option<String> {
    if event.delivery_context.is_redelivery {
        info!("line_redelivery_skipped");
        return None;
    }

    let text = match &event.message {
        MessageContent::Text(content) => &content.text,
        MessageContent::Other => {
            debug!("line_nontext_skipped");
            return None;
        }
    };

    info!(message_length = text.len(), "line_text_message_received");

    let reply = checker.correct(text).await;

    if reply.is_empty() {
        info!("line_reply_suppressed_empty");
        return None;
    }
    if reply == NO_CORRECTIONS {
        info!("line_reply_suppressed_no_corrections");
        return None;
    }

    Some(reply)
}
