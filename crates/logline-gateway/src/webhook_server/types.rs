//! Response envelopes for the webhook endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use logline_record::RecordSource;
use serde::Serialize;
use serde_json::{json, Value};

/// Error payload rendered as `{"error": message}`.
#[derive(Debug)]
pub(super) struct WebhookApiError {
    pub(super) status: StatusCode,
    pub(super) message: &'static str,
}

impl WebhookApiError {
    pub(super) fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    pub(super) fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "invalid or missing signature")
    }

    pub(super) fn bad_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "missing or invalid payload")
    }

    pub(super) fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Success body: the record actually returned and the path that produced it.
#[derive(Debug, Serialize)]
pub(super) struct WebhookResponse {
    pub(super) logline: Value,
    pub(super) llm_used: RecordSource,
}
