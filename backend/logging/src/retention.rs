//! Log retention
//!
//! Deletes rolled log files older than the retention window. The janitor
//! runs once at spawn and then on a fixed interval until shut down.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::logger::{APP_LOG_PREFIX, ERROR_LOG_PREFIX};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

fn is_log_file(name: &str) -> bool {
    name.starts_with(APP_LOG_PREFIX) || name.starts_with(ERROR_LOG_PREFIX)
}

/// Remove log files in `dir` last modified more than `retention_days` ago.
///
/// Returns how many files were deleted. A missing directory counts as empty.
pub fn clean_logs(dir: &Path, retention_days: u32) -> io::Result<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };
    let cutoff = SystemTime::now()
        .checked_sub(DAY * retention_days)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let meta = entry.metadata()?;
        if !meta.is_file() || !is_log_file(name) {
            continue;
        }
        if meta.modified()? < cutoff {
            std::fs::remove_file(entry.path())?;
            removed += 1;
        }
    }

    if removed > 0 {
        info!(dir = %dir.display(), removed, retention_days, "Old log files removed");
    }
    Ok(removed)
}

/// Background task that keeps the log directory within its retention window.
pub struct LogJanitor {
    handle: JoinHandle<()>,
}

impl LogJanitor {
    /// Must be called inside a tokio runtime.
    pub fn spawn(dir: PathBuf, retention_days: u32, every: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let dir = dir.clone();
                let result =
                    tokio::task::spawn_blocking(move || clean_logs(&dir, retention_days)).await;
                match result {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => warn!("Log cleanup failed: {}", e),
                    Err(e) => warn!("Log cleanup task failed: {}", e),
                }
            }
        });
        Self { handle }
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}
