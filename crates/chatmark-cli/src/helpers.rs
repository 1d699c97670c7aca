//! Shared helpers for the CLI subcommands.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chatmark_render::{Clipboard, MemoryClipboard, SystemClipboard};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG`; falls back to `default_level`. Logs go to stderr so
/// `render` output on stdout stays clean.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Load `.env` from the working directory, if present.
pub fn load_env() {
    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => debug!("no .env file"),
        Err(e) => tracing::warn!(error = %e, "failed to load .env"),
    }
}

/// The clipboard copy actions write to.
pub fn build_clipboard(headless: bool) -> Arc<dyn Clipboard> {
    if headless {
        info!("headless mode, copies stay in memory");
        Arc::new(MemoryClipboard::new())
    } else {
        Arc::new(SystemClipboard)
    }
}

/// Read the whole of `file`, or stdin when `None`.
pub fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reply.md");
        std::fs::write(&path, "# Title\n").unwrap();

        assert_eq!(read_input(Some(&path)).unwrap(), "# Title\n");
    }

    #[test]
    fn read_input_missing_file_names_path() {
        let err = read_input(Some(Path::new("/nonexistent/reply.md"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/reply.md"));
    }
}
