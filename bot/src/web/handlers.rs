//! Webhook endpoint handlers.
//!
//! The webhook handler stays thin: verify the `X-Line-Signature` HMAC over
//! the raw body, run the correction pipeline, and answer `OK`. In background
//! mode even that moves into a spawned task so LINE gets its acknowledgment
//! without waiting on the model.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{error, info};

use crate::checker::GrammarChecker;
use crate::config::DispatchMode;
use crate::line::LineClient;
use crate::process::process_webhook;
use crate::web::signature::verify_line_signature;
use crate::Config;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "X-Line-Signature";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub checker: GrammarChecker,
    pub line: LineClient,
}

impl AppState {
    pub fn new(config: Config, checker: GrammarChecker, line: LineClient) -> Self {
        Self {
            config: Arc::new(config),
            checker,
            line,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "proofbot",
    })
}

// =============================================================================
// LINE Webhook
// =============================================================================

/// LINE webhook endpoint, also mounted at `/callback`.
///
/// Sync mode:
/// 1. Verifies the signature over the raw body (400 on mismatch)
/// 2. Runs the correction pipeline for every event (500 on a bad payload)
/// 3. Returns 200 `OK`
///
/// Background mode acknowledges with 200 `OK` before verification; both
/// signature and processing failures are then only visible in the logs.
pub async fn line_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    info!(
        body_length = body.len(),
        has_signature = signature.is_some(),
        "line_webhook_received"
    );

    match state.config.dispatch {
        DispatchMode::Sync => handle_sync(&state, &body, signature.as_deref()).await,
        DispatchMode::Background => {
            tokio::spawn(async move {
                handle_background(state, body, signature).await;
            });
            (StatusCode::OK, "OK")
        }
    }
}

async fn handle_sync(
    state: &AppState,
    body: &[u8],
    signature: Option<&str>,
) -> (StatusCode, &'static str) {
    if !verify_line_signature(&state.config.channel_secret, body, signature) {
        return (StatusCode::BAD_REQUEST, "invalid signature");
    }

    match process_webhook(&state.checker, &state.line, body).await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            error!(error = %e, "line_webhook_process_failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "error")
        }
    }
}

async fn handle_background(state: AppState, body: Bytes, signature: Option<String>) {
    // The verifier logs each rejection, nothing more to do here.
    if !verify_line_signature(&state.config.channel_secret, &body, signature.as_deref()) {
        return;
    }

    if let Err(e) = process_webhook(&state.checker, &state.line, &body).await {
        error!(error = %e, "line_webhook_process_failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    use crate::gemini::{GenerateError, GenerateText};

    const SECRET: &str = "test-channel-secret";

    struct StubGenerator;

    #[async_trait]
    impl GenerateText for StubGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
            Ok("unused".to_string())
        }
    }

    fn test_state(dispatch: DispatchMode) -> AppState {
        let config = Config {
            channel_access_token: "access-token".to_string(),
            channel_secret: SECRET.to_string(),
            gemini_api_key: "key".to_string(),
            gemini_api_url: None,
            gemini_model: "gemini-3-flash-preview".to_string(),
            dispatch,
            port: 5000,
            request_timeout_ms: 10_000,
        };

        AppState::new(
            config,
            GrammarChecker::new(Arc::new(StubGenerator)),
            LineClient::new(reqwest::Client::new(), "access-token".to_string()),
        )
    }

    fn sign(body: &[u8]) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(body);
        BASE64.encode(mac.finalize().into_bytes())
    }

    fn signed_headers(body: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(SIGNATURE_HEADER, sign(body).parse().unwrap());
        headers
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let Json(response) = health().await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.service, "proofbot");
    }

    #[tokio::test]
    async fn test_webhook_sync_rejects_missing_signature() {
        let response = line_webhook(
            State(test_state(DispatchMode::Sync)),
            HeaderMap::new(),
            Bytes::from_static(br#"{"events":[]}"#),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_webhook_sync_rejects_wrong_signature() {
        let body = br#"{"events":[]}"#;
        let mut headers = HeaderMap::new();
        headers.insert(SIGNATURE_HEADER, sign(b"other body").parse().unwrap());

        let response = line_webhook(
            State(test_state(DispatchMode::Sync)),
            headers,
            Bytes::from_static(body),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_webhook_sync_accepts_valid_signature() {
        let body = br#"{"destination":"U1234","events":[]}"#;

        let response = line_webhook(
            State(test_state(DispatchMode::Sync)),
            signed_headers(body),
            Bytes::from_static(body),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");
    }

    #[tokio::test]
    async fn test_webhook_sync_invalid_payload_is_server_error() {
        let body = b"not a webhook payload";

        let response = line_webhook(
            State(test_state(DispatchMode::Sync)),
            signed_headers(body),
            Bytes::from_static(body),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_webhook_background_acknowledges_before_verification() {
        let response = line_webhook(
            State(test_state(DispatchMode::Background)),
            HeaderMap::new(),
            Bytes::from_static(br#"{"events":[]}"#),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");
    }
}
