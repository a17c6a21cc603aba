//! Log Redaction Layer
//!
//! Scrubs webhook credentials, API keys, access tokens and phone numbers
//! from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static TELEPHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap());
static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(sk-[a-zA-Z0-9]{32,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap());
// Google Chat webhooks carry `?key=...&token=...`.
static WEBHOOK_SECRET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([?&](?:key|token)=)[^&\s\x22']+").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = WEBHOOK_SECRET_RE.replace_all(input, "${1}[REDACTED]");
    let redacted = API_KEY_RE.replace_all(&redacted, "[REDACTED_TOKEN]");
    TELEPHONE_RE.replace_all(&redacted, "[REDACTED_PHONE]").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = "Sending to +1-555-123-4567 with Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("+1-555-123-4567"));
        assert!(!clean.contains("Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
    }

    #[test]
    fn webhook_key_and_token_are_masked() {
        let url = "https://chat.googleapis.com/v1/spaces/AAA/messages?key=AIzaSy123&token=abc%3D";
        assert_eq!(
            redact_sensitive_data(url),
            "https://chat.googleapis.com/v1/spaces/AAA/messages?key=[REDACTED]&token=[REDACTED]"
        );

        let logged = format!(r#"{{"url":"{url}"}}"#);
        let clean = redact_sensitive_data(&logged);
        assert!(!clean.contains("AIzaSy123"));
        assert!(clean.ends_with(r#"token=[REDACTED]"}"#));
    }
}
