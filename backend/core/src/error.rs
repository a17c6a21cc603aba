use thiserror::Error;

/// Top-level error type for the cardwire bridge.
#[derive(Debug, Error)]
pub enum CardwireError {
    #[error("markdown content is empty")]
    EmptyInput,

    /// An image could not be used and was replaced by a placeholder.
    /// Never propagated out of a conversion; only reported to observers.
    #[error("image degraded ({url}): {reason}")]
    ImageDegraded { url: String, reason: String },

    #[error("Cards V2 validation failed: {0}")]
    SchemaInvalid(String),

    #[error("webhook send failed: {0}")]
    TransportFailure(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
