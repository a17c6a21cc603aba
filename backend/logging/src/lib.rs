//! Telemetry and structured logging components for cardwire.
//!
//! Handles log redaction, JSON output generation, file rotation, retention
//! and message event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;
pub mod retention;

pub use event_logger::{EventLogEntry, TracingObserver};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
pub use retention::{clean_logs, LogJanitor};
