//! Config redaction: a copy of the config that is safe to log or print.
//!
//! Google Chat webhook URLs authenticate through their `key` and `token`
//! query parameters; those values are masked.

use url::Url;

use crate::schema::CardwireConfig;

const SENSITIVE_PARAMS: &[&str] = &["key", "token"];
const MASK: &str = "***";

/// Redact a config, masking webhook credentials.
pub fn redact(config: &CardwireConfig) -> CardwireConfig {
    let mut redacted = config.clone();
    redacted.webhook.url = config.webhook.url.as_deref().map(redact_webhook_url);
    redacted
}

/// Mask credential query values. Unparsable input is masked entirely.
pub fn redact_webhook_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return MASK.to_string();
    };
    if url.query().is_none() {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let sensitive = SENSITIVE_PARAMS.iter().any(|p| p.eq_ignore_ascii_case(&k));
            let value = if sensitive { MASK.to_string() } else { v.into_owned() };
            (k.into_owned(), value)
        })
        .collect();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_key_and_token() {
        let url = "https://chat.googleapis.com/v1/spaces/AAA/messages?key=AIzaSy123&token=abc%3D";
        assert_eq!(
            redact_webhook_url(url),
            "https://chat.googleapis.com/v1/spaces/AAA/messages?key=***&token=***"
        );
    }

    #[test]
    fn keeps_other_params_and_fields() {
        let mut cfg = CardwireConfig::default();
        cfg.webhook.url = Some("https://example.test/hook?threadKey=t1&key=s".into());
        cfg.logging.level = "debug".into();

        let redacted = redact(&cfg);
        assert_eq!(
            redacted.webhook.url.as_deref(),
            Some("https://example.test/hook?threadKey=t1&key=***")
        );
        assert_eq!(redacted.logging.level, "debug");
        assert!(cfg.webhook.url.unwrap().ends_with("key=s"));
    }

    #[test]
    fn unparsable_url_is_fully_masked() {
        assert_eq!(redact_webhook_url("key=abc"), "***");
    }

    #[test]
    fn missing_url_stays_missing() {
        assert_eq!(redact(&CardwireConfig::default()).webhook.url, None);
    }
}
