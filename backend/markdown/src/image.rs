//! Image resolver
//!
//! Normalizes an image reference, rejects anything that is not HTTPS and
//! asks the [`ImageValidator`] whether the target really is an image. Every
//! failure degrades to a text placeholder; nothing here returns an error.

use std::sync::Arc;

use cardwire_core::{
    CardwireError, EventObserver, ImageValidator, MessageEvent, MessageEventKind, Widget,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use tracing::{debug, warn};

static ENCODED_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)%3C.*?%3E").unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").unwrap());
static ABSOLUTE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://[\w\-./?%&=+#~,:@()\[\]!]*").unwrap());

/// Clean a raw image href down to the URL that will be checked.
///
/// Encoded and literal tag remnants are dropped, the result is
/// percent-decoded once and the first absolute URL in it wins. When no
/// absolute URL is present the decoded text is returned as is.
pub fn normalize_image_url(raw: &str) -> String {
    let cleaned = ENCODED_TAG.replace_all(raw, "");
    let cleaned = TAG.replace_all(&cleaned, "");
    let decoded = urlencoding::decode(&cleaned)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| cleaned.to_string());
    let decoded = decoded.trim();
    match ABSOLUTE_URL.find(decoded) {
        Some(m) => m.as_str().to_string(),
        None => decoded.to_string(),
    }
}

fn is_https(url: &str) -> bool {
    url.get(..8)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://"))
}

pub struct ImageResolver {
    validator: Arc<dyn ImageValidator>,
    observer: Arc<dyn EventObserver>,
}

impl ImageResolver {
    pub fn new(validator: Arc<dyn ImageValidator>, observer: Arc<dyn EventObserver>) -> Self {
        Self { validator, observer }
    }

    /// Produce the widget for one image reference.
    ///
    /// Validations run one at a time, in the order callers invoke this.
    pub async fn resolve(&self, href: &str, alt: &str) -> Widget {
        let url = normalize_image_url(href);
        let alt = TAG.replace_all(alt, "");
        let alt = alt.trim();

        if url.is_empty() || !is_https(&url) {
            self.degraded(&url, alt, "not an https url");
            let label = if alt.is_empty() { "invalid url" } else { alt };
            return Widget::text(format!("[IMAGE: {label}] {url}"));
        }

        let result = self.validator.validate(&url).await;
        if !result.valid {
            let reason = result.error.as_deref().unwrap_or("unknown error");
            self.degraded(&url, alt, reason);
            let label = if alt.is_empty() { "image" } else { alt };
            return Widget::text(format!(
                "[Image failed to load: {label}] <a href=\"{url}\">{url}</a>\n❌ {reason}"
            ));
        }

        debug!(url = %url, content_type = ?result.content_type, "Image validated");
        let alt = if alt.is_empty() { "image" } else { alt };
        Widget::image(url, alt)
    }

    fn degraded(&self, url: &str, alt: &str, reason: &str) {
        let err = CardwireError::ImageDegraded {
            url: url.to_string(),
            reason: reason.to_string(),
        };
        warn!(error = %err, "Image replaced by placeholder");
        self.observer.record(MessageEvent::new(
            MessageEventKind::ImageValidationFailed,
            json!({ "url": url, "alt": alt, "reason": reason }),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cardwire_core::ImageValidationResult;
    use std::sync::Mutex;

    struct Fixed(ImageValidationResult);

    #[async_trait]
    impl ImageValidator for Fixed {
        async fn validate(&self, _url: &str) -> ImageValidationResult {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<MessageEvent>>);

    impl EventObserver for Recorder {
        fn record(&self, event: MessageEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    fn resolver(result: ImageValidationResult) -> (ImageResolver, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        (ImageResolver::new(Arc::new(Fixed(result)), recorder.clone()), recorder)
    }

    #[test]
    fn normalize_strips_markup_and_decodes() {
        assert_eq!(
            normalize_image_url("https://a.test/x%20y.png%3Cspan%3E"),
            "https://a.test/x"
        );
        assert_eq!(
            normalize_image_url("<b>https://a.test/p.png</b>"),
            "https://a.test/p.png"
        );
        assert_eq!(normalize_image_url("  /relative.png "), "/relative.png");
    }

    #[tokio::test]
    async fn valid_image_becomes_image_widget() {
        let (resolver, recorder) =
            resolver(ImageValidationResult::ok(Some("image/png".into()), Some(10)));
        let widget = resolver.resolve("https://a.test/p.png", "").await;
        assert_eq!(widget, Widget::image("https://a.test/p.png", "image"));
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn http_url_is_rejected_without_validation() {
        let (resolver, recorder) = resolver(ImageValidationResult::ok(None, None));
        let widget = resolver.resolve("http://a.test/p.png", "").await;
        assert_eq!(widget.as_text(), Some("[IMAGE: invalid url] http://a.test/p.png"));
        assert_eq!(recorder.0.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_image_mentions_alt_and_reason() {
        let (resolver, recorder) = resolver(ImageValidationResult::invalid("HTTP 404: Not Found"));
        let widget = resolver.resolve("https://bad.example/x.jpg", "alt").await;
        let text = widget.as_text().expect("placeholder");
        assert!(text.starts_with("[Image failed to load: alt]"));
        assert!(text.contains(r#"<a href="https://bad.example/x.jpg">"#));
        assert!(text.ends_with("❌ HTTP 404: Not Found"));

        let events = recorder.0.lock().unwrap();
        assert_eq!(events[0].kind, MessageEventKind::ImageValidationFailed);
        assert_eq!(events[0].payload["reason"], "HTTP 404: Not Found");
    }
}
