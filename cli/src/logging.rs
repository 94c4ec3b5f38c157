//! Logging initialization.
//!
//! Reads `RUST_LOG` (level) and `LOG_FILE` (path) from env (e.g. via .env).
//! - `LOG_FILE` set: logs go to that file through a non-blocking writer, plain text.
//! - `serve` without `LOG_FILE`: logs go to stderr.
//! - one-shot commands without `LOG_FILE`: logs are dropped so stdout carries only the record.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Initializes tracing. Keep the returned guard alive until exit so buffered file logs are flushed.
pub fn init(console: bool) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper_util=off"));

    if let Some(path) = std::env::var_os("LOG_FILE").map(PathBuf::from) {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let name = path.file_name().ok_or("LOG_FILE has no file name")?;
        std::fs::create_dir_all(dir)?;
        let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(filter);
        tracing_subscriber::registry().with(file_layer).init();
        tracing::info!(path = %path.display(), "prompthancer logging to file");
        return Ok(Some(guard));
    }

    if console {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(filter);
        tracing_subscriber::registry().with(stderr_layer).init();
    } else {
        let sink_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::sink)
            .with_filter(filter);
        tracing_subscriber::registry().with(sink_layer).init();
    }
    Ok(None)
}
