//! Config validation with field paths and user-friendly messages.

use thiserror::Error;
use url::Url;

use crate::schema::CardwireConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// Every error and warning found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &CardwireConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_webhook(config, &mut report);
    validate_images(config, &mut report);
    validate_markdown(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_webhook(config: &CardwireConfig, report: &mut ValidationReport) {
    match config.webhook.url.as_deref() {
        None => report.warn(
            "webhook.url",
            "No webhook URL configured; messages will be logged instead of sent",
        ),
        // Never echo the URL itself, it carries the webhook key.
        Some(raw) => match Url::parse(raw) {
            Err(e) => report.error("webhook.url", format!("Not a valid URL: {e}")),
            Ok(url) if url.scheme() != "https" => {
                report.error("webhook.url", format!("Scheme must be https, got '{}'", url.scheme()))
            }
            Ok(_) => {}
        },
    }
    if config.webhook.timeout_ms == 0 {
        report.error("webhook.timeoutMs", "timeoutMs must be > 0");
    }
}

fn validate_images(config: &CardwireConfig, report: &mut ValidationReport) {
    if config.images.timeout_ms == 0 {
        report.error("images.timeoutMs", "timeoutMs must be > 0");
    }
    if config.images.validate && config.images.user_agent.trim().is_empty() {
        report.warn("images.userAgent", "Empty user agent; some image hosts reject such requests");
    }
}

fn validate_markdown(config: &CardwireConfig, report: &mut ValidationReport) {
    if config.markdown.default_text.trim().is_empty() {
        report.warn("markdown.defaultText", "Untitled cards will be sent without notification text");
    }
}

fn validate_logging(config: &CardwireConfig, report: &mut ValidationReport) {
    let logging = &config.logging;
    if logging.dir.trim().is_empty() {
        report.error("logging.dir", "Log directory cannot be empty");
    }
    if !LOG_LEVELS.contains(&logging.level.as_str()) {
        report.error(
            "logging.level",
            format!("Unknown level '{}'. Use one of: {}", logging.level, LOG_LEVELS.join(", ")),
        );
    }
    if logging.retention_days == 0 {
        report.error("logging.retentionDays", "retentionDays must be >= 1");
    }
    if logging.cleanup_interval_hours == 0 {
        report.error("logging.cleanupIntervalHours", "cleanupIntervalHours must be >= 1");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> CardwireConfig {
        let mut cfg = CardwireConfig::default();
        cfg.webhook.url = Some(url.to_string());
        cfg
    }

    #[test]
    fn default_config_is_valid_with_missing_url_warning() {
        let report = validate(&CardwireConfig::default());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, "webhook.url");
    }

    #[test]
    fn https_webhook_passes() {
        let report = validate(&with_url("https://chat.googleapis.com/v1/spaces/A/messages?key=k&token=t"));
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn plain_http_and_garbage_urls_are_errors() {
        let report = validate(&with_url("http://chat.googleapis.com/v1/spaces/A/messages?key=secret"));
        assert!(!report.is_valid());
        assert!(report.errors[0].message.contains("https"));
        assert!(!report.errors[0].message.contains("secret"));

        assert!(!validate(&with_url("not a url")).is_valid());
    }

    #[test]
    fn zero_values_and_unknown_level_are_errors() {
        let mut cfg = CardwireConfig::default();
        cfg.webhook.timeout_ms = 0;
        cfg.images.timeout_ms = 0;
        cfg.logging.retention_days = 0;
        cfg.logging.level = "verbose".into();

        let paths: Vec<_> = validate(&cfg).errors.into_iter().map(|e| e.path).collect();
        assert_eq!(
            paths,
            vec!["webhook.timeoutMs", "images.timeoutMs", "logging.level", "logging.retentionDays"]
        );
    }
}
