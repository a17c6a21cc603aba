use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A delivery-related event reported to an [`EventObserver`](crate::EventObserver).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub kind: MessageEventKind,
    pub payload: serde_json::Value,
}

/// Categories of events emitted while converting and sending messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageEventKind {
    /// A card or text message reached the webhook
    MessageSent,
    /// The card path failed and the raw markdown was sent as text
    FallbackUsed,
    /// Nothing could be delivered
    SendFailed,
    /// Markdown could not be turned into a card
    ConversionFailed,
    /// An image was replaced by a placeholder
    ImageValidationFailed,
}

impl MessageEventKind {
    /// Whether this event describes a failure that should be logged as an error.
    pub fn is_error(self) -> bool {
        matches!(self, MessageEventKind::SendFailed | MessageEventKind::ConversionFailed)
    }
}

impl MessageEvent {
    pub fn new(kind: MessageEventKind, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind,
            payload,
        }
    }
}

impl std::fmt::Display for MessageEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| format!("{:?}", self));
        write!(f, "{}", s)
    }
}
