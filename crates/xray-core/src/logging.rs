use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use tracing::debug;
use tracing_appender::rolling;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "xray.log";
const LOG_RETENTION_DAYS: u64 = 7;
const DEFAULT_FILTER: &str = "warn";

/// Where log output goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Also write a daily rolling log file under [`log_dir`].
    pub file: bool,
    /// Override the log directory.
    pub dir: Option<PathBuf>,
}

/// Return the log directory path.
///
/// Precedence: `XRAY_LOG_DIR` env var > platform data dir > `./logs`.
/// Linux: `$XDG_DATA_HOME/xray/logs/` or `~/.local/share/xray/logs/`
pub fn log_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("XRAY_LOG_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(data) = dirs::data_dir() {
        return data.join("xray").join("logs");
    }

    PathBuf::from("logs")
}

/// Remove xray log files older than `max_age_days` from `log_path`.
///
/// Only files whose name starts with `xray.log` are touched, so a shared
/// directory keeps its other files. Returns how many files were removed.
fn cleanup_old_logs(log_path: &Path, max_age_days: u64) -> usize {
    let cutoff = SystemTime::now() - Duration::from_secs(max_age_days * 86400);
    let Ok(entries) = std::fs::read_dir(log_path) else {
        return 0;
    };
    let mut removed = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(LOG_FILE_PREFIX) {
            continue;
        }
        let modified = entry.metadata().and_then(|meta| meta.modified());
        if matches!(modified, Ok(modified) if modified < cutoff)
            && std::fs::remove_file(entry.path()).is_ok()
        {
            removed += 1;
        }
    }
    removed
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("XRAY_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the global tracing subscriber.
///
/// Filter controlled by `XRAY_LOG` or `RUST_LOG` (default: `warn`).
/// Events go to stderr, so rendered trees on stdout stay clean. With
/// [`LogOptions::file`], events are also written to a daily rotated file
/// with 7-day retention.
pub fn init(options: &LogOptions) -> Result<()> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let mut log_file = None;
    let file_layer = if options.file {
        let log_path = options.dir.clone().unwrap_or_else(log_dir);
        std::fs::create_dir_all(&log_path)
            .with_context(|| format!("failed to create log directory {}", log_path.display()))?;
        let removed = cleanup_old_logs(&log_path, LOG_RETENTION_DAYS);

        let file_appender = rolling::daily(&log_path, LOG_FILE_PREFIX);
        log_file = Some((log_path, removed));
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .boxed(),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter())
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install the global tracing subscriber")?;

    // Events before try_init are dropped, so report the file setup here.
    if let Some((log_path, removed)) = log_file {
        debug!(dir = %log_path.display(), removed, "writing logs to file");
    }
    Ok(())
}
