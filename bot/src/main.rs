//! Proofbot web server - LINE webhook receiver.
//!
//! This binary wires the whole service together:
//! - Receives webhook deliveries from the LINE platform
//! - Verifies the `X-Line-Signature` HMAC over the raw body
//! - Corrects or translates text messages through the Gemini API
//! - Replies to the sender through the LINE reply API

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use proofbot::web::{health, line_webhook, AppState};
use proofbot::{Config, GeminiClient, GrammarChecker, LineClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        port = config.port,
        dispatch = ?config.dispatch,
        model = %config.gemini_model,
        api_url_override = config.gemini_api_url.is_some(),
        request_timeout_ms = config.request_timeout_ms,
        "config_loaded"
    );

    // Shared HTTP client for both outbound APIs
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .build()
        .context("Failed to build HTTP client")?;

    let gemini = GeminiClient::new(
        http.clone(),
        config.gemini_api_key.clone(),
        config.gemini_endpoint(),
    );
    let checker = GrammarChecker::new(Arc::new(gemini));
    let line = LineClient::new(http, config.channel_access_token.clone());

    // Create application state
    let state = AppState::new(config.clone(), checker, line);

    // Build the router; /callback mirrors /webhook for older channel setups
    let app = Router::new()
        .route("/health", get(health))
        .route("/webhook", post(line_webhook))
        .route("/callback", post(line_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
