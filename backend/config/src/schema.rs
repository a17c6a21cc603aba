//! Cardwire runtime configuration schema.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! is a complete configuration.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardwireConfig {
    /// Google Chat incoming webhook
    pub webhook: WebhookConfig,

    /// Image URL validation during conversion
    pub images: ImageConfig,

    /// Markdown send behaviour
    pub markdown: MarkdownConfig,

    /// Log files and retention
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookConfig {
    /// Full webhook URL including `key`/`token`. Unset means sends are mocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageConfig {
    /// When false every https image is accepted without a network check.
    pub validate: bool,
    pub timeout_ms: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkdownConfig {
    /// Resend the raw markdown as text when a card send fails.
    pub fallback_to_text: bool,
    /// Message text sent next to cards that have no title.
    pub default_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    pub dir: String,
    pub level: String,
    pub retention_days: u32,
    pub cleanup_interval_hours: u64,
}
