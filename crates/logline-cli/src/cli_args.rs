use std::path::PathBuf;

use clap::Parser;
use logline_ai::{DEFAULT_CHAT_COMPLETIONS_URL, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS};
use logline_gateway::DEFAULT_LOGLINE_DIR;

const DEFAULT_LLM_TIMEOUT_SECONDS: u64 = 20;
const DEFAULT_PORT: u16 = 5000;

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "logline-webhook",
    about = "Receives signed GitHub webhooks and records them as LogLines",
    version
)]
pub(crate) struct Cli {
    #[arg(
        long = "webhook-secret",
        env = "WEBHOOK_SECRET",
        hide_env_values = true,
        help = "Shared secret used to verify X-Hub-Signature-256; requests are rejected when unset"
    )]
    pub(crate) webhook_secret: Option<String>,

    #[arg(
        long = "github-token",
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "Bearer token for the remote summarizer; only local fallback records are produced when unset"
    )]
    pub(crate) github_token: Option<String>,

    #[arg(
        long = "llm-api-url",
        env = "LLM_API_URL",
        default_value = DEFAULT_CHAT_COMPLETIONS_URL,
        help = "Chat-completions endpoint used to summarize events"
    )]
    pub(crate) llm_api_url: String,

    #[arg(
        long = "llm-model",
        env = "LLM_MODEL",
        help = "Optional model name sent with each summarization request"
    )]
    pub(crate) llm_model: Option<String>,

    #[arg(
        long = "llm-timeout",
        env = "LLM_TIMEOUT",
        default_value_t = DEFAULT_LLM_TIMEOUT_SECONDS,
        value_parser = parse_positive_u64,
        help = "Per-attempt timeout in seconds for the remote summarizer"
    )]
    pub(crate) llm_timeout: u64,

    #[arg(
        long = "llm-retries",
        env = "LLM_RETRIES",
        default_value_t = DEFAULT_MAX_ATTEMPTS,
        help = "Total remote summarizer attempts per webhook (0 disables the remote call)"
    )]
    pub(crate) llm_retries: usize,

    #[arg(
        long = "llm-retry-delay-ms",
        env = "LLM_RETRY_DELAY_MS",
        default_value_t = DEFAULT_RETRY_DELAY_MS,
        help = "Fixed pause between remote summarizer attempts"
    )]
    pub(crate) llm_retry_delay_ms: u64,

    #[arg(
        long = "bind-host",
        env = "BIND_HOST",
        default_value = "0.0.0.0",
        help = "Interface the webhook server listens on"
    )]
    pub(crate) bind_host: String,

    #[arg(
        long,
        env = "PORT",
        default_value_t = DEFAULT_PORT,
        help = "Port the webhook server listens on"
    )]
    pub(crate) port: u16,

    #[arg(
        long = "logline-dir",
        env = "LOGLINE_DIR",
        default_value = DEFAULT_LOGLINE_DIR,
        help = "Directory receiving one JSON file per record; file output is skipped when it does not exist"
    )]
    pub(crate) logline_dir: PathBuf,

    #[arg(
        long = "no-console-echo",
        env = "LOGLINE_NO_CONSOLE_ECHO",
        default_value_t = false,
        help = "Do not print each record to stdout"
    )]
    pub(crate) no_console_echo: bool,
}

impl Cli {
    pub(crate) fn bind_address(&self) -> String {
        let host = self.bind_host.trim();
        if host.contains(':') && !host.starts_with('[') {
            return format!("[{host}]:{}", self.port);
        }
        format!("{host}:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{parse_positive_u64, Cli};

    #[test]
    fn unit_parse_positive_u64_rejects_zero_and_garbage() {
        assert_eq!(parse_positive_u64("20"), Ok(20));
        assert!(parse_positive_u64("0").is_err());
        assert!(parse_positive_u64("soon").is_err());
    }

    #[test]
    fn functional_cli_accepts_explicit_overrides() {
        let cli = Cli::try_parse_from([
            "logline-webhook",
            "--webhook-secret",
            "s3cret",
            "--github-token",
            "token",
            "--llm-timeout",
            "5",
            "--llm-retries",
            "4",
            "--llm-retry-delay-ms",
            "100",
            "--bind-host",
            "127.0.0.1",
            "--port",
            "8080",
            "--logline-dir",
            "/tmp/loglines",
            "--no-console-echo",
        ])
        .expect("parse cli");

        assert_eq!(cli.webhook_secret.as_deref(), Some("s3cret"));
        assert_eq!(cli.github_token.as_deref(), Some("token"));
        assert_eq!(cli.llm_timeout, 5);
        assert_eq!(cli.llm_retries, 4);
        assert_eq!(cli.llm_retry_delay_ms, 100);
        assert_eq!(cli.bind_address(), "127.0.0.1:8080");
        assert_eq!(cli.logline_dir, std::path::PathBuf::from("/tmp/loglines"));
        assert!(cli.no_console_echo);
    }

    #[test]
    fn regression_cli_rejects_zero_timeout() {
        let error = Cli::try_parse_from(["logline-webhook", "--llm-timeout", "0"])
            .expect_err("zero timeout should be rejected");
        assert!(error.to_string().contains("greater than 0"));
    }

    #[test]
    fn unit_bind_address_brackets_ipv6_hosts() {
        let cli = Cli::try_parse_from(["logline-webhook", "--bind-host", "::1", "--port", "5000"])
            .expect("parse cli");
        assert_eq!(cli.bind_address(), "[::1]:5000");
    }
}
