//! `cardwire convert`: print the Cards V2 JSON for a markdown document.

use std::path::Path;

use anyhow::{Context, Result};
use cardwire_channels::validate_cards_v2;
use cardwire_config::CardwireConfig;
use serde_json::json;

use crate::app;

pub async fn run(config: &CardwireConfig, title: Option<&str>, file: Option<&Path>) -> Result<()> {
    let markdown = app::read_input(file).await?;
    let cards = app::converter(config)?.convert(&markdown, title).await?;

    let cards = serde_json::to_value(&cards)?;
    validate_cards_v2(&cards).context("Converted cards failed schema validation")?;

    println!("{}", serde_json::to_string_pretty(&json!({ "cardsV2": cards }))?);
    Ok(())
}
