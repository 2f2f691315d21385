//! Summarize, validate-or-fallback and persist steps of one webhook delivery.
use std::sync::Arc;

use logline_ai::RemoteSummary;
use logline_record::{
    fallback_logline, is_valid_logline, RecordSource, DEFAULT_FALLBACK_REASON,
    INVALID_REMOTE_OUTPUT_REASON,
};
use serde_json::Value;

use super::WebhookServerConfig;

#[derive(Debug, Clone, PartialEq)]
/// Final record for a delivery together with the source that produced it.
pub struct LogLineOutcome {
    pub record: Value,
    pub source: RecordSource,
}

/// Runs the summarizer, falls back when needed, and persists the result.
pub async fn produce_logline(
    config: &WebhookServerConfig,
    event_name: &str,
    payload: &Value,
) -> LogLineOutcome {
    let summary = config.summarizer.summarize(event_name, payload).await;
    let outcome = select_logline(event_name, payload, summary);

    // Persisters write with std::fs; keep them off the async workers.
    let persister = Arc::clone(&config.persister);
    let record = outcome.record.clone();
    if let Err(error) = tokio::task::spawn_blocking(move || persister.persist(&record)).await {
        tracing::error!(error = %error, "logline persistence task failed");
    }
    tracing::info!(
        event = event_name,
        llm_used = outcome.source.as_str(),
        "logline produced"
    );
    outcome
}

/// Keeps a valid remote candidate, otherwise builds the local fallback record.
///
/// The reported source always matches the record returned.
pub fn select_logline(event_name: &str, payload: &Value, summary: RemoteSummary) -> LogLineOutcome {
    let reason = match summary.candidate {
        Some(candidate) if is_valid_logline(&candidate) => {
            return LogLineOutcome {
                record: candidate,
                source: summary.source,
            };
        }
        Some(_) => {
            tracing::warn!(
                event = event_name,
                "remote logline failed validation; using local fallback"
            );
            INVALID_REMOTE_OUTPUT_REASON
        }
        None => {
            tracing::info!(
                event = event_name,
                attempts = summary.attempts,
                failure = summary.failure.as_deref().unwrap_or("none"),
                "remote summarizer unavailable; using local fallback"
            );
            DEFAULT_FALLBACK_REASON
        }
    };

    LogLineOutcome {
        record: fallback_logline(event_name, payload, reason).to_record(),
        source: RecordSource::LocalFallback,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc::{channel, Receiver};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use logline_ai::{LocalOnlySummarizer, RemoteSummary};
    use logline_record::{is_valid_logline, RecordSource};
    use serde_json::{json, Value};

    use super::{produce_logline, select_logline};
    use crate::logline_store::LogLinePersister;
    use crate::webhook_server::WebhookServerConfig;

    /// Blocks inside `persist` until the async side signals it.
    struct HandshakePersister {
        release: Mutex<Receiver<()>>,
        released: AtomicBool,
    }

    impl LogLinePersister for HandshakePersister {
        fn persist(&self, _record: &Value) {
            let received = self
                .release
                .lock()
                .map(|release| release.recv_timeout(Duration::from_secs(2)).is_ok())
                .unwrap_or(false);
            self.released.store(received, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn regression_produce_logline_persists_without_blocking_runtime_worker() {
        let (release_tx, release_rx) = channel();
        let persister = Arc::new(HandshakePersister {
            release: Mutex::new(release_rx),
            released: AtomicBool::new(false),
        });
        let config = WebhookServerConfig {
            summarizer: Arc::new(LocalOnlySummarizer),
            persister: persister.clone(),
            webhook_secret: None,
            bind: "127.0.0.1:0".to_string(),
        };

        let worker = tokio::spawn(async move {
            produce_logline(&config, "push", &json!({"ref": "main"})).await
        });
        // The current-thread runtime can only run this while persist waits elsewhere.
        tokio::time::sleep(Duration::from_millis(50)).await;
        release_tx.send(()).expect("signal persister");

        let outcome = worker.await.expect("worker task");
        assert_eq!(outcome.source, RecordSource::LocalFallback);
        assert!(persister.released.load(Ordering::SeqCst));
    }

    #[test]
    fn unit_select_logline_keeps_valid_remote_candidate() {
        let candidate = json!({"who": "github_app", "this": "ok"});
        let outcome = select_logline(
            "push",
            &json!({}),
            RemoteSummary::remote(candidate.clone(), 1),
        );
        assert_eq!(outcome.record, candidate);
        assert_eq!(outcome.source, RecordSource::CopilotChat);
    }

    #[test]
    fn unit_select_logline_falls_back_when_remote_unavailable() {
        let outcome = select_logline(
            "push",
            &json!({"ref": "main"}),
            RemoteSummary::unavailable(2, Some("timeout".to_string())),
        );
        assert_eq!(outcome.source, RecordSource::LocalFallback);
        assert!(is_valid_logline(&outcome.record));
        assert_eq!(outcome.record["error"], json!("LLM unavailable"));
        assert_eq!(
            outcome.record["this"],
            json!("Event push received. (local fallback: LLM unavailable)")
        );
    }

    #[test]
    fn regression_select_logline_reports_fallback_source_for_invalid_candidate() {
        for candidate in [json!([1, 2, 3]), json!("text"), json!({"did": "x"})] {
            let outcome =
                select_logline("issues", &json!({}), RemoteSummary::remote(candidate, 1));
            assert_eq!(outcome.source, RecordSource::LocalFallback);
            assert_eq!(outcome.record["error"], json!("LLM output failed validation"));
        }
    }
}
