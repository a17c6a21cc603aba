//! `cardwire clean-logs`: one-off retention sweep.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cardwire_config::CardwireConfig;
use logging::clean_logs;

pub async fn run(config: &CardwireConfig) -> Result<()> {
    let dir = PathBuf::from(&config.logging.dir);
    let days = config.logging.retention_days;
    let removed = tokio::task::spawn_blocking({
        let dir = dir.clone();
        move || clean_logs(&dir, days)
    })
    .await?
    .with_context(|| format!("Failed to clean {}", dir.display()))?;

    println!("Removed {removed} log file(s) older than {days} day(s) from {}", dir.display());
    Ok(())
}
