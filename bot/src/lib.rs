//! Proofbot - LINE grammar-correction webhook service.
//!
//! This library provides the modules behind the `proofbot-server` binary:
//! - `web`: thin axum endpoint that verifies LINE webhook signatures
//! - `process`: per-event pipeline from webhook payload to reply decision
//! - `checker`: English classification, prompt construction, correction
//! - `gemini`: the remote text-generation transport
//! - `line`: LINE webhook payload model and reply client
//!
//! ## Architecture
//!
//! ```text
//! LINE platform → /webhook → signature check → classifier → Gemini → reply
//! ```

pub mod checker;
pub mod config;
pub mod gemini;
pub mod line;
pub mod process;
pub mod web;

// Re-export commonly used types
pub use checker::{GrammarChecker, NO_CORRECTIONS, SERVICE_UNAVAILABLE};
pub use config::{Config, DispatchMode};
pub use gemini::{GeminiClient, GenerateText};
pub use line::{LineClient, WebhookPayload};
pub use process::process_webhook;
pub use web::AppState;
