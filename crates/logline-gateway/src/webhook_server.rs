use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use logline_ai::LogLineSummarizer;
use logline_signature::{verify_webhook_signature, GITHUB_SIGNATURE_HEADER};
use serde_json::Value;
use tokio::net::TcpListener;

use crate::logline_store::LogLinePersister;

mod pipeline;
mod types;

pub use pipeline::{produce_logline, select_logline, LogLineOutcome};
use types::{WebhookApiError, WebhookResponse};

pub const WEBHOOK_ENDPOINT: &str = "/webhook";
pub const GITHUB_EVENT_HEADER: &str = "x-github-event";
pub const DEFAULT_EVENT_NAME: &str = "unknown_event";

#[derive(Clone)]
/// Immutable settings shared by every webhook request.
pub struct WebhookServerConfig {
    pub summarizer: Arc<dyn LogLineSummarizer>,
    pub persister: Arc<dyn LogLinePersister>,
    pub webhook_secret: Option<String>,
    pub bind: String,
}

#[derive(Clone)]
pub struct WebhookServerState {
    config: WebhookServerConfig,
}

impl WebhookServerState {
    pub fn new(config: WebhookServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WebhookServerConfig {
        &self.config
    }

    fn webhook_secret(&self) -> Option<&[u8]> {
        self.config
            .webhook_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(str::as_bytes)
    }
}

/// Binds `config.bind` and serves the webhook endpoint until Ctrl-C.
pub async fn run_webhook_server(config: WebhookServerConfig) -> Result<()> {
    let bind_addr = config
        .bind
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid webhook bind address '{}'", config.bind))?;
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind webhook server on {bind_addr}"))?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve bound webhook server address")?;

    if config.webhook_secret.as_deref().is_none_or(str::is_empty) {
        tracing::warn!("webhook secret is not configured; every delivery will be rejected");
    }
    tracing::info!(
        endpoint = WEBHOOK_ENDPOINT,
        addr = %local_addr,
        "logline webhook server listening"
    );

    let state = Arc::new(WebhookServerState::new(config));
    let app = build_webhook_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("logline webhook server exited unexpectedly")?;

    tracing::info!("logline webhook server stopped");
    Ok(())
}

pub fn build_webhook_router(state: Arc<WebhookServerState>) -> Router {
    Router::new()
        .route(WEBHOOK_ENDPOINT, post(handle_webhook))
        .with_state(state)
}

async fn handle_webhook(
    State(state): State<Arc<WebhookServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = header_str(&headers, GITHUB_SIGNATURE_HEADER);
    if !verify_webhook_signature(state.webhook_secret(), &body, signature) {
        return WebhookApiError::unauthorized().into_response();
    }

    let event_name = header_str(&headers, GITHUB_EVENT_HEADER)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_EVENT_NAME)
        .to_string();
    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => payload,
        Err(error) => {
            tracing::warn!(event = %event_name, error = %error, "webhook payload is not valid JSON");
            return WebhookApiError::bad_request().into_response();
        }
    };

    // Runs detached so a caller disconnect cannot cancel summarization or persistence.
    let worker_state = Arc::clone(&state);
    let worker = tokio::spawn(async move {
        produce_logline(worker_state.config(), &event_name, &payload).await
    });
    match worker.await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(WebhookResponse {
                logline: outcome.record,
                llm_used: outcome.source,
            }),
        )
            .into_response(),
        Err(error) => {
            tracing::error!(error = %error, "webhook worker task failed");
            WebhookApiError::internal().into_response()
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
