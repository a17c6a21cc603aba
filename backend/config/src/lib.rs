//! `cardwire-config` — runtime configuration for the cardwire service.
//!
//! Provides:
//! - Typed config schema with defaults for every field
//! - Optional YAML file loading
//! - Environment overrides
//! - Validation report
//! - Redaction for safe logging/display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{apply_env_overrides, process_env, InvalidEnvVarError};
pub use io::{config_file_path, load_config, parse_config};
pub use redact::{redact, redact_webhook_url};
pub use schema::{CardwireConfig, ImageConfig, LoggingConfig, MarkdownConfig, WebhookConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Resolve, load and apply env overrides.
///
/// Validation is left to the caller so the report can be logged once the
/// subscriber (which itself needs this config) is installed.
pub async fn load_and_prepare(
    explicit: Option<&Path>,
    env: &HashMap<String, String>,
) -> Result<CardwireConfig> {
    let path = config_file_path(explicit);
    let config = load_config(&path).await?;
    apply_env_overrides(config, env).context("Failed to apply environment overrides")
}

/// Log every warning and error in a report.
pub fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
}
