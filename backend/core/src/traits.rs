use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::event::MessageEvent;

/// A capability exposed to the tool-calling host.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name of the tool (e.g., "send_google_chat_text").
    fn name(&self) -> &str;

    /// Description shown to the host model.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's parameters.
    fn parameters(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments and return its JSON output.
    async fn execute(&self, args: serde_json::Value) -> Result<serde_json::Value, anyhow::Error>;
}

/// Outcome of checking that an image URL is reachable and really an image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageValidationResult {
    pub fn ok(content_type: Option<String>, content_length: Option<u64>) -> Self {
        Self { valid: true, content_type, content_length, error: None }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self { valid: false, error: Some(error.into()), ..Default::default() }
    }
}

/// Confirms an image URL before it is embedded in a card.
///
/// Implementations must not fail for ordinary network problems; they report
/// `valid: false` with an error description instead.
#[async_trait]
pub trait ImageValidator: Send + Sync {
    async fn validate(&self, url: &str) -> ImageValidationResult;
}

/// Receives delivery events (sent, fallback, failures, degraded images).
pub trait EventObserver: Send + Sync {
    fn record(&self, event: MessageEvent);
}

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl EventObserver for NullObserver {
    fn record(&self, _event: MessageEvent) {}
}
