//! Config defaults.

use crate::schema::{ImageConfig, LoggingConfig, MarkdownConfig, WebhookConfig};

/// Webhook request timeout.
pub const DEFAULT_WEBHOOK_TIMEOUT_MS: u64 = 5_000;

/// Per-image validation timeout.
pub const DEFAULT_IMAGE_TIMEOUT_MS: u64 = 5_000;

pub const DEFAULT_USER_AGENT: &str = concat!("cardwire/", env!("CARGO_PKG_VERSION"));

/// Message text used when a markdown card has no title.
pub const DEFAULT_CARD_TEXT: &str = "Markdown Message";

pub const DEFAULT_LOG_DIR: &str = "./logs";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Days a rolled log file is kept before the janitor removes it.
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

pub const DEFAULT_CLEANUP_INTERVAL_HOURS: u64 = 24;

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: DEFAULT_WEBHOOK_TIMEOUT_MS,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            validate: true,
            timeout_ms: DEFAULT_IMAGE_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            fallback_to_text: true,
            default_text: DEFAULT_CARD_TEXT.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: DEFAULT_LOG_DIR.to_string(),
            level: DEFAULT_LOG_LEVEL.to_string(),
            retention_days: DEFAULT_RETENTION_DAYS,
            cleanup_interval_hours: DEFAULT_CLEANUP_INTERVAL_HOURS,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::CardwireConfig;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = CardwireConfig::default();
        assert_eq!(cfg.webhook.timeout_ms, 5_000);
        assert_eq!(cfg.images.timeout_ms, 5_000);
        assert!(cfg.images.validate);
        assert!(cfg.images.user_agent.starts_with("cardwire/"));
        assert!(cfg.markdown.fallback_to_text);
        assert_eq!(cfg.markdown.default_text, "Markdown Message");
        assert_eq!(cfg.logging.dir, "./logs");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.logging.retention_days, 30);
        assert_eq!(cfg.logging.cleanup_interval_hours, 24);
    }
}
