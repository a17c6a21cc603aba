//! Environment overrides applied on top of the file config.
//!
//! Overrides are read from an explicit map so callers (and tests) decide
//! where the environment comes from. Empty values are ignored.

use std::collections::HashMap;

use crate::schema::CardwireConfig;

pub const WEBHOOK_URL_VAR: &str = "GOOGLE_CHAT_WEBHOOK_URL";
pub const WEBHOOK_TIMEOUT_VAR: &str = "WEBHOOK_TIMEOUT_MS";
pub const IMAGE_VALIDATION_VAR: &str = "IMAGE_VALIDATION";
pub const IMAGE_TIMEOUT_VAR: &str = "IMAGE_VALIDATION_TIMEOUT_MS";
pub const LOG_DIR_VAR: &str = "LOG_DIR";
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
pub const LOG_RETENTION_VAR: &str = "LOG_RETENTION_DAYS";

/// Error returned for an override whose value cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("Invalid value {value:?} for env var \"{var_name}\": {reason}")]
pub struct InvalidEnvVarError {
    pub var_name: String,
    pub value: String,
    pub reason: String,
}

/// Snapshot of the process environment.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Apply every recognised override found in `env`.
pub fn apply_env_overrides(
    mut config: CardwireConfig,
    env: &HashMap<String, String>,
) -> Result<CardwireConfig, InvalidEnvVarError> {
    let get = |name: &str| env.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(url) = get(WEBHOOK_URL_VAR) {
        config.webhook.url = Some(url.to_string());
    }
    if let Some(raw) = get(WEBHOOK_TIMEOUT_VAR) {
        config.webhook.timeout_ms = parse_number(WEBHOOK_TIMEOUT_VAR, raw)?;
    }
    if let Some(raw) = get(IMAGE_VALIDATION_VAR) {
        config.images.validate = parse_flag(IMAGE_VALIDATION_VAR, raw)?;
    }
    if let Some(raw) = get(IMAGE_TIMEOUT_VAR) {
        config.images.timeout_ms = parse_number(IMAGE_TIMEOUT_VAR, raw)?;
    }
    if let Some(dir) = get(LOG_DIR_VAR) {
        config.logging.dir = dir.to_string();
    }
    if let Some(level) = get(LOG_LEVEL_VAR) {
        config.logging.level = level.to_ascii_lowercase();
    }
    if let Some(raw) = get(LOG_RETENTION_VAR) {
        config.logging.retention_days = parse_number(LOG_RETENTION_VAR, raw)?;
    }
    Ok(config)
}

fn parse_number<T: std::str::FromStr>(var: &str, raw: &str) -> Result<T, InvalidEnvVarError>
where
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| InvalidEnvVarError {
        var_name: var.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_flag(var: &str, raw: &str) -> Result<bool, InvalidEnvVarError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(InvalidEnvVarError {
            var_name: var.to_string(),
            value: raw.to_string(),
            reason: "expected true/false or 1/0".to_string(),
        }),
    }
}
