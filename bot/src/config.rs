//! Configuration module for environment variable parsing.
//!
//! Required credentials fail startup with a listing of every missing name;
//! optional knobs fall back to defaults with a logged warning on garbage.

use std::env;

use tracing::warn;
use url::Url;

/// Default model for the Generative Language API.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Base URL of the Generative Language API, used when no override is set.
const DEFAULT_GEMINI_BASE: &str = "https://generativelanguage.googleapis.com";

/// How the webhook handler dispatches verified payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Verify and process before responding; signature failures become 400s.
    Sync,
    /// Acknowledge immediately and verify/process in a spawned task;
    /// signature failures are only logged.
    Background,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// LINE channel access token for the reply API
    pub channel_access_token: String,

    /// LINE channel secret used for webhook signature verification
    pub channel_secret: String,

    /// API key for the Generative Language API
    pub gemini_api_key: String,

    /// Optional full override of the generateContent endpoint URL
    pub gemini_api_url: Option<String>,

    /// Model name used to build the default endpoint
    pub gemini_model: String,

    /// Webhook dispatch mode (sync or background)
    pub dispatch: DispatchMode,

    /// Port for the web server to listen on
    pub port: u16,

    /// HTTP request timeout in milliseconds for outbound calls
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Collects all absent required variables before failing so the startup
    /// error names every one of them at once.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut missing = Vec::new();

        let channel_access_token = require("LINE_CHANNEL_ACCESS_TOKEN", &mut missing);
        let channel_secret = require("LINE_CHANNEL_SECRET", &mut missing);
        let gemini_api_key = require("GEMINI_API_KEY", &mut missing);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let gemini_api_url = match env::var("GEMINI_API_URL") {
            Ok(raw) if !raw.trim().is_empty() => {
                Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
                    name: "GEMINI_API_URL",
                    reason: e.to_string(),
                })?;
                Some(raw.trim().to_string())
            }
            _ => None,
        };

        Ok(Config {
            channel_access_token,
            channel_secret,
            gemini_api_key,
            gemini_api_url,

            gemini_model: env::var("GEMINI_MODEL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),

            dispatch: parse_dispatch("WEBHOOK_DISPATCH"),

            port: parse_or_default("PORT", 5000),

            request_timeout_ms: parse_or_default("REQUEST_TIMEOUT_MS", 10_000),
        })
    }

    /// Resolve the generateContent endpoint: the configured override, or the
    /// default endpoint built from the model name.
    pub fn gemini_endpoint(&self) -> String {
        match &self.gemini_api_url {
            Some(url) => url.clone(),
            None => format!(
                "{DEFAULT_GEMINI_BASE}/v1beta/models/{}:generateContent",
                self.gemini_model
            ),
        }
    }
}

/// Read a required variable, recording its name when unset or blank.
fn require(name: &str, missing: &mut Vec<String>) -> String {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => {
            missing.push(name.to_string());
            String::new()
        }
    }
}

/// Parse an optional variable, falling back to the default on garbage.
fn parse_or_default<T: std::str::FromStr>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}

/// Parse the dispatch mode, defaulting to sync.
fn parse_dispatch(name: &str) -> DispatchMode {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return DispatchMode::Sync,
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "sync" => DispatchMode::Sync,
        "background" => DispatchMode::Background,
        _ => {
            warn!(env_var = name, value = %raw, "Unknown dispatch mode, using sync");
            DispatchMode::Sync
        }
    }
}
