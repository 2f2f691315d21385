use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use httpmock::prelude::*;
use logline_ai::{ChatSummarizer, ChatSummarizerConfig};
use logline_gateway::{
    build_webhook_router, read_persisted_logline, ConsoleDirectoryPersister, WebhookServerConfig,
    WebhookServerState, WEBHOOK_ENDPOINT,
};
use logline_record::is_valid_logline;
use logline_signature::github_sha256_signature;
use serde_json::{json, Value};
use tokio::net::TcpListener;

static WORKSPACE_COUNTER: AtomicU64 = AtomicU64::new(1);
const SECRET: &str = "integration-secret";

struct IsolatedWorkspace {
    root: PathBuf,
}

impl IsolatedWorkspace {
    fn new(label: &str) -> Self {
        let tick = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let count = WORKSPACE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let root = std::env::temp_dir().join(format!(
            "logline-{label}-{}-{tick}-{count}",
            std::process::id()
        ));
        fs::create_dir_all(&root).expect("must create isolated workspace root");
        Self { root }
    }

    fn root(&self) -> &Path {
        &self.root
    }
}

impl Drop for IsolatedWorkspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn summarizer_for(api_url: String) -> ChatSummarizer {
    ChatSummarizer::new(ChatSummarizerConfig {
        api_url,
        api_token: "integration-token".to_string(),
        model: None,
        request_timeout_ms: 5_000,
        max_attempts: 3,
        retry_delay_ms: 10,
    })
    .expect("summarizer should be created")
}

async fn spawn_gateway(summarizer: ChatSummarizer, store: &Path) -> SocketAddr {
    let state = Arc::new(WebhookServerState::new(WebhookServerConfig {
        summarizer: Arc::new(summarizer),
        persister: Arc::new(ConsoleDirectoryPersister::new(
            Some(store.to_path_buf()),
            false,
        )),
        webhook_secret: Some(SECRET.to_string()),
        bind: "127.0.0.1:0".to_string(),
    }));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral listener");
    let addr = listener.local_addr().expect("listener addr");
    let app = build_webhook_router(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    addr
}

async fn deliver(addr: SocketAddr, event: &str, body: &Value) -> (u16, Value) {
    let raw = body.to_string();
    let signature = github_sha256_signature(SECRET.as_bytes(), raw.as_bytes()).expect("sign");
    let response = reqwest::Client::new()
        .post(format!("http://{addr}{WEBHOOK_ENDPOINT}"))
        .header("X-Hub-Signature-256", signature)
        .header("X-GitHub-Event", event)
        .header("content-type", "application/json")
        .body(raw)
        .send()
        .await
        .expect("deliver webhook");
    let status = response.status().as_u16();
    let payload = response.json::<Value>().await.expect("json response");
    (status, payload)
}

fn persisted_files(store: &Path) -> Vec<PathBuf> {
    let mut files = fs::read_dir(store)
        .expect("read store")
        .map(|entry| entry.expect("entry").path())
        .collect::<Vec<_>>();
    files.sort();
    files
}

#[tokio::test]
async fn integration_remote_logline_is_returned_and_persisted() {
    let workspace = IsolatedWorkspace::new("remote");
    let store = workspace.root().join("loglines");
    fs::create_dir_all(&store).expect("create store");

    let remote = MockServer::start();
    let mock = remote.mock(|when, then| {
        when.method(POST).path("/models/copilot-chat");
        then.status(200).json_body(json!({
            "choices": [{"message": {"content": "```json\n{\"who\":\"github_app\",\"did\":\"register_event\",\"this\":\"Issue #7 opened\",\"status\":\"executed\",\"confirmed_by\":[\"PromptOS\"],\"emitted_at\":\"2024-03-04T05:06:07.123456Z\"}\n```"}}]
        }));
    });
    let addr = spawn_gateway(summarizer_for(remote.url("/models/copilot-chat")), &store).await;

    let (status, body) = deliver(addr, "issues", &json!({"action": "opened", "issue": {"number": 7}})).await;

    assert_eq!(status, 200);
    mock.assert_hits(1);
    assert_eq!(body["llm_used"], json!("copilot-chat"));
    assert_eq!(body["logline"]["this"], json!("Issue #7 opened"));

    let files = persisted_files(&store);
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("2024-03-04T05-06-07-123456Z.json"));
    let stored = read_persisted_logline(&files[0]).expect("read stored logline");
    assert_eq!(stored, body["logline"]);
}

#[tokio::test]
async fn integration_rejected_token_degrades_to_persisted_fallback_after_one_attempt() {
    let workspace = IsolatedWorkspace::new("fatal");
    let store = workspace.root().join("loglines");
    fs::create_dir_all(&store).expect("create store");

    let remote = MockServer::start();
    let mock = remote.mock(|when, then| {
        when.method(POST).path("/models/copilot-chat");
        then.status(401).json_body(json!({"message": "Bad credentials"}));
    });
    let addr = spawn_gateway(summarizer_for(remote.url("/models/copilot-chat")), &store).await;

    let (status, body) = deliver(addr, "push", &json!({"ref": "refs/heads/main"})).await;

    assert_eq!(status, 200);
    mock.assert_hits(1);
    assert_eq!(body["llm_used"], json!("local-fallback"));
    assert!(is_valid_logline(&body["logline"]));
    assert_eq!(body["logline"]["error"], json!("LLM unavailable"));

    let files = persisted_files(&store);
    assert_eq!(files.len(), 1);
    let stored = read_persisted_logline(&files[0]).expect("read stored logline");
    assert_eq!(stored, body["logline"]);
}

#[tokio::test]
async fn integration_transient_failures_exhaust_attempts_before_fallback() {
    let workspace = IsolatedWorkspace::new("transient");
    let store = workspace.root().join("loglines");
    fs::create_dir_all(&store).expect("create store");

    let remote = MockServer::start();
    let mock = remote.mock(|when, then| {
        when.method(POST).path("/models/copilot-chat");
        then.status(502).body("bad gateway");
    });
    let addr = spawn_gateway(summarizer_for(remote.url("/models/copilot-chat")), &store).await;

    let (status, body) = deliver(addr, "release", &json!({"action": "published"})).await;

    assert_eq!(status, 200);
    mock.assert_hits(3);
    assert_eq!(body["llm_used"], json!("local-fallback"));
    assert_eq!(
        body["logline"]["payload_excerpt"],
        json!("{\"action\":\"published\"}")
    );
}
