use std::sync::Arc;

use anyhow::{Context, Result};
use logline_ai::{ChatSummarizer, ChatSummarizerConfig, LocalOnlySummarizer, LogLineSummarizer};
use logline_gateway::{run_webhook_server, ConsoleDirectoryPersister, WebhookServerConfig};

use crate::cli_args::Cli;

pub(crate) async fn run_cli(cli: Cli) -> Result<()> {
    let config = build_server_config(&cli)?;
    run_webhook_server(config).await
}

pub(crate) fn build_server_config(cli: &Cli) -> Result<WebhookServerConfig> {
    let persister = ConsoleDirectoryPersister::new(
        Some(cli.logline_dir.clone()),
        !cli.no_console_echo,
    );
    Ok(WebhookServerConfig {
        summarizer: build_summarizer(cli)?,
        persister: Arc::new(persister),
        webhook_secret: cli.webhook_secret.clone(),
        bind: cli.bind_address(),
    })
}

fn build_summarizer(cli: &Cli) -> Result<Arc<dyn LogLineSummarizer>> {
    let Some(token) = cli
        .github_token
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
    else {
        tracing::warn!("GITHUB_TOKEN is not configured; every record will use the local fallback");
        return Ok(Arc::new(LocalOnlySummarizer));
    };

    let summarizer = ChatSummarizer::new(ChatSummarizerConfig {
        api_url: cli.llm_api_url.clone(),
        api_token: token.to_string(),
        model: cli.llm_model.clone(),
        request_timeout_ms: cli.llm_timeout.saturating_mul(1_000),
        max_attempts: cli.llm_retries,
        retry_delay_ms: cli.llm_retry_delay_ms,
    })
    .context("failed to initialize remote summarizer")?;
    tracing::info!(
        api_url = %cli.llm_api_url,
        timeout_seconds = cli.llm_timeout,
        max_attempts = cli.llm_retries,
        "remote summarizer configured"
    );
    Ok(Arc::new(summarizer))
}
