//! Config file discovery and loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, info};

use crate::schema::CardwireConfig;

/// Env var naming the config file when `--config` is not given.
pub const CONFIG_PATH_VAR: &str = "CARDWIRE_CONFIG";

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the config file path.
/// Priority: explicit path > `CARDWIRE_CONFIG` > `<user config dir>/cardwire/config.yaml`
pub fn config_file_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cardwire")
        .join(CONFIG_FILE_NAME)
}

/// Parse a YAML document. An empty document yields the defaults.
pub fn parse_config(raw: &str) -> Result<CardwireConfig> {
    if raw.trim().is_empty() {
        return Ok(CardwireConfig::default());
    }
    serde_yaml::from_str(raw).context("Failed to parse config YAML")
}

/// Load the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist.
pub async fn load_config(path: &Path) -> Result<CardwireConfig> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(CardwireConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = parse_config(&raw).with_context(|| format!("Invalid config at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.yaml")).await.unwrap();
        assert_eq!(cfg, CardwireConfig::default());
    }

    #[tokio::test]
    async fn loads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "images:\n  validate: false\nmarkdown:\n  defaultText: Update\n").unwrap();

        let cfg = load_config(&path).await.unwrap();
        assert!(!cfg.images.validate);
        assert_eq!(cfg.markdown.default_text, "Update");
        assert!(cfg.markdown.fallback_to_text);
    }

    #[tokio::test]
    async fn malformed_yaml_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "webhook: [unclosed").unwrap();

        let err = load_config(&path).await.unwrap_err();
        assert!(format!("{err:#}").contains("bad.yaml"));
    }

    #[test]
    fn explicit_path_wins() {
        let path = config_file_path(Some(Path::new("/etc/cardwire.yaml")));
        assert_eq!(path, PathBuf::from("/etc/cardwire.yaml"));
    }

    #[test]
    fn blank_document_is_default() {
        assert_eq!(parse_config("\n").unwrap(), CardwireConfig::default());
    }
}
