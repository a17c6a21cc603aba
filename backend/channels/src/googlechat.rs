//! Google Chat incoming-webhook sender.
//!
//! Posts plain `{ "text" }` or `{ "text"?, "cardsV2" }` messages. Without a
//! configured URL every send is logged and answered with a mocked receipt.

use std::time::Duration;

use cardwire_core::CardwireError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

/// What Google Chat told us about a delivered message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    /// Resource name, e.g. `spaces/AAA/messages/BBB`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// True when no webhook was configured and nothing left the process.
    #[serde(default)]
    pub mocked: bool,
}

impl SendReceipt {
    pub fn mocked() -> Self {
        Self { name: None, mocked: true }
    }
}

pub struct GoogleChatWebhook {
    url: Option<String>,
    http: Client,
}

impl GoogleChatWebhook {
    pub fn new(url: Option<String>, timeout: Duration) -> Result<Self, CardwireError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CardwireError::Config(format!("building HTTP client: {e}")))?;
        let url = url.filter(|u| !u.trim().is_empty());
        Ok(Self { url, http })
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    pub async fn send_text(&self, text: &str) -> Result<SendReceipt, CardwireError> {
        self.post("text", json!({ "text": text })).await
    }

    /// Send a Cards V2 message. `cards` is serialized as the `cardsV2` array.
    pub async fn send_cards<C: Serialize + ?Sized>(
        &self,
        text: Option<&str>,
        cards: &C,
    ) -> Result<SendReceipt, CardwireError> {
        let cards = serde_json::to_value(cards)
            .map_err(|e| CardwireError::SchemaInvalid(format!("cards are not serializable: {e}")))?;
        let mut payload = json!({ "cardsV2": cards });
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            payload["text"] = json!(text);
        }
        self.post("cardsV2", payload).await
    }

    async fn post(&self, kind: &str, payload: Value) -> Result<SendReceipt, CardwireError> {
        let Some(url) = &self.url else {
            info!(kind, payload = %payload, "No webhook configured; skipping HTTP send");
            return Ok(SendReceipt::mocked());
        };

        let res = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CardwireError::TransportFailure(e.without_url().to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(CardwireError::TransportFailure(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let body: Value = res.json().await.unwrap_or(Value::Null);
        let name = body.get("name").and_then(Value::as_str).map(str::to_string);
        debug!(kind, name = ?name, "Webhook accepted message");
        Ok(SendReceipt { name, mocked: false })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_webhook::MockWebhookServer;
    use axum::{http::StatusCode, routing::post, Router};
    use cardwire_core::{Card, CardEnvelope, Section, Widget};

    fn webhook(url: Option<String>) -> GoogleChatWebhook {
        GoogleChatWebhook::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn unconfigured_webhook_is_mocked() {
        let chat = webhook(Some("  ".into()));
        assert!(!chat.is_configured());
        assert_eq!(chat.send_text("hi").await.unwrap(), SendReceipt::mocked());
    }

    #[tokio::test]
    async fn text_and_cards_reach_the_webhook() {
        let server = MockWebhookServer::start(([127, 0, 0, 1], 0).into()).await.unwrap();
        let chat = webhook(Some(server.url()));

        let receipt = chat.send_text("plain").await.unwrap();
        assert_eq!(receipt.name.as_deref(), Some("spaces/MOCK_SPACE/messages/MSG_1"));
        assert!(!receipt.mocked);

        let card = Card::new(None, vec![Section::new(vec![Widget::text("x")]).unwrap()]).unwrap();
        let cards = vec![CardEnvelope::new(card)];
        chat.send_cards(Some("Title"), &cards).await.unwrap();

        let requests = server.requests().await;
        assert_eq!(requests[0].body, json!({ "text": "plain" }));
        assert_eq!(requests[1].body["text"], "Title");
        assert_eq!(
            requests[1].body["cardsV2"][0]["card"]["sections"][0]["widgets"][0]["textParagraph"]["text"],
            "x"
        );

        server.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn http_errors_are_transport_failures() {
        let app = Router::new().route(
            "/webhook",
            post(|| async { (StatusCode::BAD_REQUEST, "Invalid JSON payload") }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let chat = webhook(Some(format!("http://{addr}/webhook")));
        match chat.send_text("x").await {
            Err(CardwireError::TransportFailure(msg)) => {
                assert_eq!(msg, "HTTP 400: Invalid JSON payload");
            }
            other => panic!("expected transport failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_errors_are_transport_failures() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let chat = webhook(Some(format!("http://{addr}/webhook?key=secret")));
        let err = chat.send_text("x").await.unwrap_err();
        assert!(matches!(err, CardwireError::TransportFailure(_)));
        assert!(!err.to_string().contains("secret"));
    }
}
