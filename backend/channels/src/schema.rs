//! Cards V2 boundary validator
//!
//! Checks an arbitrary JSON value against the subset of the Cards V2 schema
//! this service emits. Used on converter output before sending and on
//! caller-supplied `cardsV2` arrays.

use cardwire_core::CardwireError;
use serde_json::{Map, Value};
use thiserror::Error;

/// First structural problem found, with the path to the offending node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

impl From<SchemaViolation> for CardwireError {
    fn from(v: SchemaViolation) -> Self {
        CardwireError::SchemaInvalid(v.to_string())
    }
}

fn violation(path: &str, message: impl Into<String>) -> SchemaViolation {
    SchemaViolation {
        path: if path.is_empty() { "$".to_string() } else { path.to_string() },
        message: message.into(),
    }
}

fn object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, SchemaViolation> {
    value
        .as_object()
        .ok_or_else(|| violation(path, "expected an object"))
}

fn string_field(obj: &Map<String, Value>, path: &str, key: &str) -> Result<(), SchemaViolation> {
    match obj.get(key) {
        Some(Value::String(_)) => Ok(()),
        Some(_) => Err(violation(&format!("{path}.{key}"), "expected a string")),
        None => Err(violation(&format!("{path}.{key}"), "required")),
    }
}

fn non_empty_array<'a>(
    obj: &'a Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<&'a Vec<Value>, SchemaViolation> {
    let path = format!("{path}.{key}");
    match obj.get(key) {
        Some(Value::Array(items)) if items.is_empty() => {
            Err(violation(&path, "must contain at least one element"))
        }
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(violation(&path, "expected an array")),
        None => Err(violation(&path, "required")),
    }
}

/// Validate a `cardsV2` array.
pub fn validate_cards_v2(cards: &Value) -> Result<(), SchemaViolation> {
    let items = cards
        .as_array()
        .ok_or_else(|| violation("", "expected an array of cards"))?;

    for (i, item) in items.iter().enumerate() {
        let path = format!("[{i}]");
        let item = object(item, &path)?;
        string_field(item, &path, "cardId")?;

        let card_path = format!("{path}.card");
        let card = match item.get("card") {
            Some(card) => object(card, &card_path)?,
            None => return Err(violation(&card_path, "required")),
        };

        if let Some(header) = card.get("header") {
            let header_path = format!("{card_path}.header");
            string_field(object(header, &header_path)?, &header_path, "title")?;
        }

        for (s, section) in non_empty_array(card, &card_path, "sections")?.iter().enumerate() {
            let section_path = format!("{card_path}.sections[{s}]");
            let section = object(section, &section_path)?;
            for (w, widget) in non_empty_array(section, &section_path, "widgets")?.iter().enumerate() {
                validate_widget(widget, &format!("{section_path}.widgets[{w}]"))?;
            }
        }
    }
    Ok(())
}

fn validate_widget(widget: &Value, path: &str) -> Result<(), SchemaViolation> {
    let widget = object(widget, path)?;
    match (widget.get("textParagraph"), widget.get("image")) {
        (Some(text), None) => {
            let text_path = format!("{path}.textParagraph");
            string_field(object(text, &text_path)?, &text_path, "text")
        }
        (None, Some(image)) => {
            let image_path = format!("{path}.image");
            let image = object(image, &image_path)?;
            match image.get("imageUrl") {
                Some(Value::String(url)) if url::Url::parse(url).is_ok() => {}
                Some(Value::String(_)) => {
                    return Err(violation(&format!("{image_path}.imageUrl"), "invalid url"));
                }
                _ => string_field(image, &image_path, "imageUrl")?,
            }
            match image.get("altText") {
                None | Some(Value::String(_)) => Ok(()),
                Some(_) => Err(violation(&format!("{image_path}.altText"), "expected a string")),
            }
        }
        (Some(_), Some(_)) => Err(violation(path, "widget must not have both textParagraph and image")),
        (None, None) => Err(violation(path, "widget must have textParagraph or image")),
    }
}
