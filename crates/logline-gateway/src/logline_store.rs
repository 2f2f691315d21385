//! Record persistence: console echo plus an optional directory of JSON files.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use logline_core::{current_utc_iso_timestamp, filesystem_safe_name, write_text_atomic};
use serde_json::Value;

pub const DEFAULT_LOGLINE_DIR: &str = "loglines";

/// Trait contract for handing a finished LogLine to storage.
///
/// Implementations must not fail the request: storage errors are logged and
/// swallowed.
pub trait LogLinePersister: Send + Sync {
    fn persist(&self, record: &Value);
}

#[derive(Debug, Clone)]
/// Prints every record and, when the directory exists, writes it to `<emitted_at>.json`.
pub struct ConsoleDirectoryPersister {
    directory: Option<PathBuf>,
    echo_to_console: bool,
}

impl ConsoleDirectoryPersister {
    pub fn new(directory: Option<PathBuf>, echo_to_console: bool) -> Self {
        Self {
            directory,
            echo_to_console,
        }
    }

    /// Destination for `record`, or `None` when file persistence is disabled.
    ///
    /// The directory is never created; a missing directory disables file output.
    pub fn record_path(&self, record: &Value) -> Option<PathBuf> {
        let directory = self.directory.as_deref().filter(|dir| dir.is_dir())?;
        Some(directory.join(logline_file_name(record)))
    }
}

impl LogLinePersister for ConsoleDirectoryPersister {
    fn persist(&self, record: &Value) {
        let rendered = match serde_json::to_string_pretty(record) {
            Ok(rendered) => rendered,
            Err(error) => {
                tracing::error!(error = %error, "failed to render logline");
                return;
            }
        };
        if self.echo_to_console {
            println!("{rendered}");
        }

        let Some(path) = self.record_path(record) else {
            return;
        };
        match write_text_atomic(&path, &rendered) {
            Ok(()) => tracing::info!(path = %path.display(), "logline saved"),
            Err(error) => tracing::error!(
                path = %path.display(),
                error = %format!("{error:#}"),
                "failed to save logline"
            ),
        }
    }
}

/// File name for `record`: its sanitized `emitted_at`, or the current time when absent.
pub fn logline_file_name(record: &Value) -> String {
    let emitted_at = record
        .get("emitted_at")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(current_utc_iso_timestamp);
    format!("{}.json", filesystem_safe_name(&emitted_at))
}

/// Reads a record previously written by [`ConsoleDirectoryPersister`].
pub fn read_persisted_logline(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
