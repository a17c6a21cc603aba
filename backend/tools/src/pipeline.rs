//! Send-markdown pipeline: convert, validate, send, fall back to text.

use std::sync::Arc;
use std::time::Instant;

use cardwire_channels::{validate_cards_v2, GoogleChatWebhook};
use cardwire_core::{CardwireError, EventObserver, MessageEvent, MessageEventKind};
use markdown::MarkdownConverter;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

pub const DEFAULT_CARD_TEXT: &str = "Markdown Message";

/// Everything a send needs; shared by all tools.
pub struct SendContext {
    pub webhook: GoogleChatWebhook,
    pub converter: MarkdownConverter,
    pub observer: Arc<dyn EventObserver>,
    /// Message `text` sent next to the cards when no title is given.
    pub default_text: String,
    /// Whether markdown sends fall back to text when the caller doesn't say.
    pub fallback_by_default: bool,
}

impl SendContext {
    pub fn new(
        webhook: GoogleChatWebhook,
        converter: MarkdownConverter,
        observer: Arc<dyn EventObserver>,
    ) -> Self {
        Self {
            webhook,
            converter,
            observer,
            default_text: DEFAULT_CARD_TEXT.to_string(),
            fallback_by_default: true,
        }
    }

    pub fn with_default_text(mut self, text: impl Into<String>) -> Self {
        self.default_text = text.into();
        self
    }

    pub fn with_fallback_by_default(mut self, enabled: bool) -> Self {
        self.fallback_by_default = enabled;
        self
    }

    pub(crate) fn record(&self, kind: MessageEventKind, payload: serde_json::Value) {
        self.observer.record(MessageEvent::new(kind, payload));
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMarkdownOptions {
    pub markdown: String,
    #[serde(default)]
    pub card_title: Option<String>,
    #[serde(default)]
    pub fallback_to_text: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMarkdownResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default)]
    pub used_fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendMarkdownResult {
    fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

/// Convert markdown to a card and send it, resending the raw markdown as
/// plain text if any step fails and fallback is enabled.
///
/// Never returns an error; failures are described in the result.
pub async fn send_markdown(ctx: &SendContext, options: SendMarkdownOptions) -> SendMarkdownResult {
    let started = Instant::now();
    let title = options
        .card_title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let err = match send_cards(ctx, &options.markdown, title).await {
        Ok(message_id) => {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            info!(message_id = ?message_id, elapsed_ms, "Markdown card sent");
            ctx.record(
                MessageEventKind::MessageSent,
                json!({ "messageId": message_id, "usedFallback": false, "elapsedMs": elapsed_ms }),
            );
            return SendMarkdownResult {
                success: true,
                message_id,
                ..Default::default()
            };
        }
        Err(err) => err,
    };

    if !options.fallback_to_text.unwrap_or(ctx.fallback_by_default) {
        return SendMarkdownResult::failed(err);
    }

    let reason = err.to_string();
    warn!(reason = %reason, "Card send failed, falling back to plain text");
    match ctx.webhook.send_text(&options.markdown).await {
        Ok(receipt) => {
            ctx.record(
                MessageEventKind::FallbackUsed,
                json!({
                    "messageId": receipt.name,
                    "reason": reason,
                    "elapsedMs": started.elapsed().as_millis() as u64,
                }),
            );
            SendMarkdownResult {
                success: true,
                message_id: receipt.name,
                used_fallback: true,
                fallback_reason: Some(reason),
                error: None,
            }
        }
        Err(send_err) => {
            ctx.record(
                MessageEventKind::SendFailed,
                json!({
                    "stage": "fallback",
                    "error": send_err.to_string(),
                    "elapsedMs": started.elapsed().as_millis() as u64,
                }),
            );
            SendMarkdownResult::failed(send_err)
        }
    }
}

async fn send_cards(
    ctx: &SendContext,
    markdown: &str,
    title: Option<&str>,
) -> Result<Option<String>, CardwireError> {
    let conversion = async {
        let cards = ctx.converter.convert(markdown, title).await?;
        let value = serde_json::to_value(&cards).map_err(anyhow::Error::from)?;
        validate_cards_v2(&value)?;
        Ok::<_, CardwireError>(cards)
    };
    let cards = conversion.await.inspect_err(|e| {
        ctx.record(MessageEventKind::ConversionFailed, json!({ "error": e.to_string() }));
    })?;

    let text = title.unwrap_or(&ctx.default_text);
    let receipt = ctx.webhook.send_cards(Some(text), &cards).await.inspect_err(|e| {
        ctx.record(
            MessageEventKind::SendFailed,
            json!({ "stage": "cards", "error": e.to_string() }),
        );
    })?;
    Ok(receipt.name)
}
