//! Message Event Logger
//!
//! Send outcomes (message_sent, fallback_used, send_failed, ...) written as
//! structured tracing events under the `cardwire_events` target, so they land
//! in the NDJSON files next to ordinary logs.

use cardwire_core::{EventObserver, MessageEvent, MessageEventKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub kind: MessageEventKind,
    pub timestamp: DateTime<Utc>,
    /// Payload JSON with secrets removed.
    pub payload: String,
}

impl EventLogEntry {
    pub fn from_event(event: &MessageEvent) -> Self {
        Self {
            kind: event.kind,
            timestamp: event.timestamp,
            payload: redact_sensitive_data(&event.payload.to_string()),
        }
    }
}

/// [`EventObserver`] that forwards every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EventObserver for TracingObserver {
    fn record(&self, event: MessageEvent) {
        let entry = EventLogEntry::from_event(&event);
        match event.kind {
            kind if kind.is_error() => {
                error!(target: "cardwire_events", event_id = %event.id, kind = %entry.kind, payload = %entry.payload, "Message event");
            }
            MessageEventKind::FallbackUsed | MessageEventKind::ImageValidationFailed => {
                warn!(target: "cardwire_events", event_id = %event.id, kind = %entry.kind, payload = %entry.payload, "Message event");
            }
            _ => {
                info!(target: "cardwire_events", event_id = %event.id, kind = %entry.kind, payload = %entry.payload, "Message event");
            }
        }
    }
}
