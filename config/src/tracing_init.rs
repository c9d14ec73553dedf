//! Tracing subscriber shared by the `citypulse` binaries.
//!
//! Filter comes from `RUST_LOG` (default `info`). Logs go to stderr; when `CITYPULSE_LOG_DIR` is
//! set, a daily-rolling file `<app>.log` in that directory receives the same events.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Directory for rolling log files. Unset means stderr only.
pub const LOG_DIR_ENV: &str = "CITYPULSE_LOG_DIR";

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("create log dir {path}: {source}")]
    LogDir {
        path: String,
        source: std::io::Error,
    },
    #[error("install subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

fn log_dir() -> Option<PathBuf> {
    std::env::var_os(LOG_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Installs the global subscriber. Keep the returned guard alive for the process lifetime so
/// buffered file output is flushed on exit.
pub fn init(app_name: &str) -> Result<Option<WorkerGuard>, InitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir() {
        Some(dir) => {
            std::fs::create_dir_all(&dir).map_err(|source| InitError::LogDir {
                path: dir.display().to_string(),
                source,
            })?;
            let appender = tracing_appender::rolling::daily(&dir, format!("{app_name}.log"));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;
    Ok(guard)
}
