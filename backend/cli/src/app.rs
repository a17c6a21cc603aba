//! Builds the runtime components from a loaded config.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cardwire_channels::{GoogleChatWebhook, HttpImageValidator, NoopImageValidator};
use cardwire_config::{CardwireConfig, ImageConfig};
use cardwire_core::{ImageValidator, ToolRegistry};
use cardwire_tools::{register_google_chat_tools, SendContext};
use logging::TracingObserver;
use markdown::MarkdownConverter;
use tokio::io::AsyncReadExt;
use tracing::info;

pub fn image_validator(images: &ImageConfig) -> Result<Arc<dyn ImageValidator>> {
    if !images.validate {
        info!("Image validation disabled; https images are used as-is");
        return Ok(Arc::new(NoopImageValidator));
    }
    let validator =
        HttpImageValidator::new(Duration::from_millis(images.timeout_ms), &images.user_agent)?;
    Ok(Arc::new(validator))
}

pub fn converter(config: &CardwireConfig) -> Result<MarkdownConverter> {
    Ok(MarkdownConverter::new(image_validator(&config.images)?)
        .with_observer(Arc::new(TracingObserver)))
}

pub fn send_context(config: &CardwireConfig) -> Result<SendContext> {
    let webhook = GoogleChatWebhook::new(
        config.webhook.url.clone(),
        Duration::from_millis(config.webhook.timeout_ms),
    )?;
    if !webhook.is_configured() {
        info!("No webhook URL configured; sends will be logged only");
    }
    Ok(
        SendContext::new(webhook, converter(config)?, Arc::new(TracingObserver))
            .with_default_text(config.markdown.default_text.clone())
            .with_fallback_by_default(config.markdown.fallback_to_text),
    )
}

pub fn tool_registry(ctx: Arc<SendContext>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    register_google_chat_tools(&mut registry, ctx);
    registry
}

/// Read the whole input from `file`, or from stdin when no file is given.
pub async fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}
