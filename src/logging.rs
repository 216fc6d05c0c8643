use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_NAME: &str = "resolve-presence.log";
const LOG_RETENTION_DAYS: u64 = 7;

/// Install console and file logging. The guard must outlive the process' last log line.
pub fn init_logging() -> WorkerGuard {
    let log_dir = get_log_directory();

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,discord_sdk=warn"));

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::info!("Logging initialized, log directory: {}", log_dir.display());
    tracing::info!("resolve-presence version: {}", env!("CARGO_PKG_VERSION"));

    let removed = cleanup_old_logs(&log_dir, SystemTime::now(), LOG_RETENTION_DAYS);
    if removed > 0 {
        tracing::debug!("Removed {} old log file(s)", removed);
    }

    guard
}

fn get_log_directory() -> PathBuf {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("resolve-presence")
        .join("logs");

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    log_dir
}

/// Rolled log files look like `resolve-presence.log.2026-10-17`
fn is_rolled_log(filename: &str) -> bool {
    filename.starts_with(LOG_FILE_NAME) && filename != LOG_FILE_NAME
}

/// Remove rolled log files last modified more than `keep_days` before `now`.
/// Returns how many files were removed.
fn cleanup_old_logs(log_dir: &Path, now: SystemTime, keep_days: u64) -> usize {
    let cutoff = now - Duration::from_secs(keep_days * 24 * 60 * 60);

    let entries = match std::fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to read log directory for cleanup: {}", e);
            return 0;
        }
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();

        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if is_rolled_log(name) => {}
            _ => continue,
        }

        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(m) => m,
            Err(_) => continue,
        };

        if modified < cutoff {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!("Failed to remove old log file {:?}: {}", path, e);
            } else {
                removed += 1;
            }
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_rolled_log_names() {
        assert!(is_rolled_log("resolve-presence.log.2026-10-17"));
        assert!(!is_rolled_log("resolve-presence.log"));
        assert!(!is_rolled_log("other.log.2026-10-17"));
    }

    #[test]
    fn test_cleanup_removes_only_expired_rolled_logs() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        std::fs::write(dir.join("resolve-presence.log.2026-01-01"), "old").unwrap();
        std::fs::write(dir.join("notes.txt"), "keep").unwrap();

        // Everything just written looks 30 days old from this vantage point.
        let later = SystemTime::now() + Duration::from_secs(30 * 24 * 60 * 60);
        assert_eq!(cleanup_old_logs(dir, later, 7), 1);
        assert!(!dir.join("resolve-presence.log.2026-01-01").exists());
        assert!(dir.join("notes.txt").exists());

        // Nothing is expired relative to the present.
        std::fs::write(dir.join("resolve-presence.log.2026-01-02"), "new").unwrap();
        assert_eq!(cleanup_old_logs(dir, SystemTime::now(), 7), 0);
    }
}
