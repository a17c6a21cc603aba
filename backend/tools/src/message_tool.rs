//! Google Chat message tools: plain text, raw Cards V2 and markdown.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use cardwire_channels::validate_cards_v2;
use cardwire_core::{MessageEventKind, Tool, ToolRegistry};
use serde_json::{json, Value};

use crate::pipeline::{send_markdown, SendContext, SendMarkdownOptions};

/// Register every Google Chat tool against one shared context.
pub fn register_google_chat_tools(registry: &mut ToolRegistry, ctx: Arc<SendContext>) {
    registry.register(Arc::new(SendTextTool::new(ctx.clone())));
    registry.register(Arc::new(SendCardsV2Tool::new(ctx.clone())));
    registry.register(Arc::new(SendMarkdownTool::new(ctx)));
}

fn sent(ctx: &SendContext, kind: &str, message_id: Option<String>) -> Value {
    ctx.record(
        MessageEventKind::MessageSent,
        json!({ "kind": kind, "messageId": message_id }),
    );
    json!({ "success": true, "messageId": message_id })
}

fn send_failed(ctx: &SendContext, kind: &str, err: &dyn std::fmt::Display) {
    ctx.record(
        MessageEventKind::SendFailed,
        json!({ "kind": kind, "error": err.to_string() }),
    );
}

pub struct SendTextTool {
    ctx: Arc<SendContext>,
}

impl SendTextTool {
    pub fn new(ctx: Arc<SendContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for SendTextTool {
    fn name(&self) -> &str {
        "send_google_chat_text"
    }

    fn description(&self) -> &str {
        "Send a plain text message to the configured Google Chat space."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Message text"
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let text = args["text"]
            .as_str()
            .ok_or_else(|| anyhow!("Missing 'text' argument"))?;

        match self.ctx.webhook.send_text(text).await {
            Ok(receipt) => Ok(sent(&self.ctx, "text", receipt.name)),
            Err(e) => {
                send_failed(&self.ctx, "text", &e);
                Err(e.into())
            }
        }
    }
}

pub struct SendCardsV2Tool {
    ctx: Arc<SendContext>,
}

impl SendCardsV2Tool {
    pub fn new(ctx: Arc<SendContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for SendCardsV2Tool {
    fn name(&self) -> &str {
        "send_google_chat_cards_v2"
    }

    fn description(&self) -> &str {
        "Send a Cards V2 message to the configured Google Chat space."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Fallback text shown in notifications"
                },
                "cardsV2": {
                    "type": "array",
                    "description": "Cards V2 array: [{ cardId, card: { header?, sections: [{ widgets }] } }]",
                    "items": { "type": "object" }
                }
            },
            "required": ["cardsV2"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let cards = args
            .get("cardsV2")
            .filter(|v| v.is_array())
            .ok_or_else(|| anyhow!("Missing 'cardsV2' array argument"))?;
        validate_cards_v2(cards).context("Cards V2 validation failed")?;
        let text = args.get("text").and_then(Value::as_str);

        match self.ctx.webhook.send_cards(text, cards).await {
            Ok(receipt) => Ok(sent(&self.ctx, "cardsV2", receipt.name)),
            Err(e) => {
                send_failed(&self.ctx, "cardsV2", &e);
                Err(e.into())
            }
        }
    }
}

pub struct SendMarkdownTool {
    ctx: Arc<SendContext>,
}

impl SendMarkdownTool {
    pub fn new(ctx: Arc<SendContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for SendMarkdownTool {
    fn name(&self) -> &str {
        "send_google_chat_markdown"
    }

    fn description(&self) -> &str {
        "Convert markdown into a Google Chat Cards V2 message and send it. \
         Falls back to plain text if conversion or delivery fails."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "markdown": {
                    "type": "string",
                    "description": "Markdown content to convert and send"
                },
                "cardTitle": {
                    "type": "string",
                    "description": "Optional card header title"
                },
                "fallbackToText": {
                    "type": "boolean",
                    "description": "Resend as plain text when the card fails (default true)"
                }
            },
            "required": ["markdown"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let options: SendMarkdownOptions =
            serde_json::from_value(args).context("Invalid params for send_google_chat_markdown")?;
        let result = send_markdown(&self.ctx, options).await;
        Ok(serde_json::to_value(result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardwire_channels::{GoogleChatWebhook, MockWebhookServer, NoopImageValidator};
    use cardwire_core::NullObserver;
    use markdown::MarkdownConverter;
    use std::time::Duration;

    fn registry(url: Option<String>) -> ToolRegistry {
        let webhook = GoogleChatWebhook::new(url, Duration::from_secs(5)).unwrap();
        let converter = MarkdownConverter::new(Arc::new(NoopImageValidator));
        let ctx = Arc::new(SendContext::new(webhook, converter, Arc::new(NullObserver)));
        let mut registry = ToolRegistry::new();
        register_google_chat_tools(&mut registry, ctx);
        registry
    }

    #[test]
    fn registers_three_tools() {
        assert_eq!(
            registry(None).list(),
            vec![
                "send_google_chat_cards_v2",
                "send_google_chat_markdown",
                "send_google_chat_text"
            ]
        );
    }

    #[tokio::test]
    async fn text_tool_requires_text() {
        let tool = registry(None).get("send_google_chat_text").unwrap();
        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(err.to_string().contains("text"));
    }

    #[tokio::test]
    async fn text_tool_sends_through_webhook() {
        let server = MockWebhookServer::start(([127, 0, 0, 1], 0).into()).await.unwrap();
        let tool = registry(Some(server.url())).get("send_google_chat_text").unwrap();

        let out = tool.execute(json!({ "text": "hello" })).await.unwrap();
        assert_eq!(out["success"], true);
        assert_eq!(out["messageId"], "spaces/MOCK_SPACE/messages/MSG_1");
        assert_eq!(server.requests().await[0].body["text"], "hello");

        server.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn cards_tool_rejects_invalid_cards() {
        let tool = registry(None).get("send_google_chat_cards_v2").unwrap();
        let bad = json!({ "cardsV2": [{ "cardId": "c", "card": { "sections": [] } }] });
        let err = tool.execute(bad).await.unwrap_err();
        assert!(format!("{err:#}").contains("[0].card.sections"));

        let err = tool.execute(json!({ "text": "x" })).await.unwrap_err();
        assert!(err.to_string().contains("cardsV2"));
    }

    #[tokio::test]
    async fn cards_tool_sends_valid_cards() {
        let tool = registry(None).get("send_google_chat_cards_v2").unwrap();
        let cards = json!({
            "cardsV2": [{
                "cardId": "c1",
                "card": { "sections": [{ "widgets": [{ "textParagraph": { "text": "hi" } }] }] }
            }]
        });
        assert_eq!(tool.execute(cards).await.unwrap()["success"], true);
    }

    #[tokio::test]
    async fn markdown_tool_returns_pipeline_result() {
        let tool = registry(None).get("send_google_chat_markdown").unwrap();
        let out = tool
            .execute(json!({ "markdown": "# Title\n\n- a\n- b", "cardTitle": "T" }))
            .await
            .unwrap();
        assert_eq!(out, json!({ "success": true, "usedFallback": false }));

        assert!(tool.execute(json!({ "cardTitle": "T" })).await.is_err());
    }
}
