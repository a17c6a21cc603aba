//! Google Chat transport
//!
//! Outbound webhook client, image reachability checks, the Cards V2
//! boundary validator and an in-process mock of the webhook endpoint.

pub mod googlechat;
pub mod image_validator;
pub mod mock_webhook;
pub mod schema;

pub use googlechat::{GoogleChatWebhook, SendReceipt};
pub use image_validator::{HttpImageValidator, NoopImageValidator};
pub use mock_webhook::{MockWebhookServer, RecordedRequest};
pub use schema::{validate_cards_v2, SchemaViolation};
