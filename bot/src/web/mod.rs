//! Web server module for the LINE webhook.
//!
//! This module provides a small web server that:
//! - Receives webhook deliveries from the LINE platform
//! - Verifies the `X-Line-Signature` HMAC over the raw body
//! - Runs the correction pipeline inline, or hands it to a background task
//! - Answers `OK` so LINE does not redeliver
//!
//! The heavy lifting lives in [`crate::process`] and [`crate::checker`].

pub mod handlers;
pub mod signature;

pub use handlers::{health, line_webhook, AppState, HealthResponse, SIGNATURE_HEADER};
pub use signature::verify_line_signature;
