//! Google Chat Cards V2 data model.
//!
//! A message carries one or more [`CardEnvelope`]s; each card holds sections
//! of widgets. Only the two widget shapes the Markdown converter emits are
//! modelled: a text paragraph and an image.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CardwireError;

/// The minimal renderable unit of a card.
///
/// Serializes externally tagged, e.g. `{"textParagraph": {"text": "..."}}`,
/// so a widget can never carry both variants or neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Widget {
    TextParagraph(TextParagraph),
    Image(ImageWidget),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextParagraph {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageWidget {
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

impl Widget {
    pub fn text(text: impl Into<String>) -> Self {
        Widget::TextParagraph(TextParagraph { text: text.into() })
    }

    pub fn image(image_url: impl Into<String>, alt_text: impl Into<String>) -> Self {
        Widget::Image(ImageWidget {
            image_url: image_url.into(),
            alt_text: Some(alt_text.into()),
        })
    }

    /// Text content, if this is a text paragraph.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Widget::TextParagraph(p) => Some(&p.text),
            Widget::Image(_) => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Widget::Image(_))
    }
}

/// A non-empty, ordered group of widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSection")]
pub struct Section {
    widgets: Vec<Widget>,
}

#[derive(Deserialize)]
struct RawSection {
    widgets: Vec<Widget>,
}

impl TryFrom<RawSection> for Section {
    type Error = CardwireError;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        Section::new(raw.widgets)
    }
}

impl Section {
    pub fn new(widgets: Vec<Widget>) -> Result<Self, CardwireError> {
        if widgets.is_empty() {
            return Err(CardwireError::SchemaInvalid(
                "section must contain at least one widget".into(),
            ));
        }
        Ok(Self { widgets })
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardHeader {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCard")]
pub struct Card {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<CardHeader>,
    sections: Vec<Section>,
}

#[derive(Deserialize)]
struct RawCard {
    #[serde(default)]
    header: Option<CardHeader>,
    sections: Vec<Section>,
}

impl TryFrom<RawCard> for Card {
    type Error = CardwireError;

    fn try_from(raw: RawCard) -> Result<Self, Self::Error> {
        Card::new(raw.header.map(|h| h.title), raw.sections)
    }
}

impl Card {
    pub fn new(title: Option<String>, sections: Vec<Section>) -> Result<Self, CardwireError> {
        if sections.is_empty() {
            return Err(CardwireError::SchemaInvalid(
                "card must contain at least one section".into(),
            ));
        }
        Ok(Self {
            header: title.map(|title| CardHeader { title }),
            sections,
        })
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// All widgets across every section, in order.
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.sections.iter().flat_map(|s| s.widgets.iter())
    }
}

/// One entry of a message's `cardsV2` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardEnvelope {
    pub card_id: String,
    pub card: Card,
}

impl CardEnvelope {
    /// Wrap a card with a fresh `md-card-<uuid>` identifier.
    pub fn new(card: Card) -> Self {
        Self {
            card_id: format!("md-card-{}", Uuid::new_v4()),
            card,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn widget_serializes_as_single_variant() {
        let text = serde_json::to_value(Widget::text("hello")).unwrap();
        assert_eq!(text, json!({ "textParagraph": { "text": "hello" } }));

        let image = serde_json::to_value(Widget::image("https://x.test/a.png", "alt")).unwrap();
        assert_eq!(
            image,
            json!({ "image": { "imageUrl": "https://x.test/a.png", "altText": "alt" } })
        );
    }

    #[test]
    fn empty_section_is_rejected() {
        assert!(matches!(
            Section::new(vec![]),
            Err(CardwireError::SchemaInvalid(_))
        ));
    }

    #[test]
    fn card_without_title_omits_header() {
        let section = Section::new(vec![Widget::text("a")]).unwrap();
        let card = Card::new(None, vec![section]).unwrap();
        let value = serde_json::to_value(CardEnvelope::new(card)).unwrap();
        assert!(value["card"].get("header").is_none());
        assert!(value["cardId"].as_str().unwrap().starts_with("md-card-"));
        assert_eq!(value["card"]["sections"][0]["widgets"][0]["textParagraph"]["text"], "a");
    }

    #[test]
    fn envelope_ids_are_unique() {
        let make = || {
            let section = Section::new(vec![Widget::text("a")]).unwrap();
            CardEnvelope::new(Card::new(Some("t".into()), vec![section]).unwrap())
        };
        assert_ne!(make().card_id, make().card_id);
    }

    #[test]
    fn deserializing_keeps_non_empty_invariant() {
        assert!(serde_json::from_value::<Section>(json!({ "widgets": [] })).is_err());
        assert!(serde_json::from_value::<Card>(json!({ "sections": [] })).is_err());

        let card: Card = serde_json::from_value(json!({
            "header": { "title": "T" },
            "sections": [{ "widgets": [{ "textParagraph": { "text": "a" } }] }]
        }))
        .unwrap();
        assert_eq!(card.header.as_ref().map(|h| h.title.as_str()), Some("T"));
        assert_eq!(card.widgets().collect::<Vec<_>>(), vec![&Widget::text("a")]);
    }
}
