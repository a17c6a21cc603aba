//! `cardwire send`: deliver one message through the configured webhook.

use std::path::Path;

use anyhow::{bail, Result};
use cardwire_config::CardwireConfig;
use cardwire_tools::{send_markdown, SendMarkdownOptions};
use serde_json::json;

use crate::app;

pub struct SendArgs {
    pub title: Option<String>,
    pub plain_text: bool,
    pub no_fallback: bool,
}

pub async fn run(config: &CardwireConfig, args: SendArgs, file: Option<&Path>) -> Result<()> {
    let input = app::read_input(file).await?;
    let ctx = app::send_context(config)?;

    if args.plain_text {
        let receipt = ctx.webhook.send_text(&input).await?;
        let out = json!({ "success": true, "messageId": receipt.name, "mocked": receipt.mocked });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let options = SendMarkdownOptions {
        markdown: input,
        card_title: args.title,
        fallback_to_text: args.no_fallback.then_some(false),
    };
    let result = send_markdown(&ctx, options).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.success {
        bail!(result.error.unwrap_or_else(|| "send failed".to_string()));
    }
    Ok(())
}
