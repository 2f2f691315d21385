use std::path::PathBuf;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub(crate) fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Result of reading `.env`, kept until tracing is installed.
pub(crate) enum DotenvOutcome {
    Loaded(PathBuf),
    Missing,
    Failed(String),
}

impl DotenvOutcome {
    pub(crate) fn log(&self) {
        match self {
            Self::Loaded(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Self::Missing => {}
            Self::Failed(error) => tracing::warn!(error = %error, "failed to load .env"),
        }
    }
}

/// Loads `.env` into the process environment before arguments are parsed.
pub(crate) fn load_dotenv() -> DotenvOutcome {
    match dotenvy::dotenv() {
        Ok(path) => DotenvOutcome::Loaded(path),
        Err(error) if error.not_found() => DotenvOutcome::Missing,
        Err(error) => DotenvOutcome::Failed(error.to_string()),
    }
}
