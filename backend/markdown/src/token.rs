//! Markdown token model
//!
//! Closed set of block and inline kinds the converter understands. Inline
//! tokens keep their raw source so the style transformer sees the original
//! markup (`**bold**`, `[label](url)`, ...).

use serde::{Deserialize, Serialize};

/// A top-level (block) token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Token {
    Heading { depth: u8, text: String },
    /// `tokens` may be empty when the producer only had flat text.
    Paragraph { text: String, tokens: Vec<Inline> },
    List(ListBlock),
    Image { href: String, alt: String },
    Code { lang: String, text: String },
    Table { header: Vec<String>, rows: Vec<Vec<String>> },
    Space,
    /// Anything without a dedicated renderer; `raw` is the verbatim source.
    Other { kind: String, raw: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBlock {
    pub ordered: bool,
    /// Start number written in the source (ordered lists only).
    pub start: Option<u64>,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// The item's own inline source, without any nested list.
    pub text: String,
    pub tokens: Vec<Inline>,
    /// Sub-lists in document order.
    pub nested: Vec<ListBlock>,
}

/// An inline token inside a paragraph or list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    Text { raw: String },
    Strong { raw: String },
    Em { raw: String },
    Codespan { raw: String },
    Strikethrough { raw: String },
    Link { raw: String, href: String },
    Image { href: String, alt: String },
    /// Inline HTML and anything else passed through verbatim.
    Other { raw: String },
}

impl Inline {
    pub fn text(raw: impl Into<String>) -> Self {
        Inline::Text { raw: raw.into() }
    }

    /// Raw source of this inline. Images have none and yield `None`.
    pub fn raw(&self) -> Option<&str> {
        match self {
            Inline::Text { raw }
            | Inline::Strong { raw }
            | Inline::Em { raw }
            | Inline::Codespan { raw }
            | Inline::Strikethrough { raw }
            | Inline::Link { raw, .. }
            | Inline::Other { raw } => Some(raw),
            Inline::Image { .. } => None,
        }
    }
}

impl ListItem {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            tokens: vec![Inline::text(text.clone())],
            text,
            nested: Vec::new(),
        }
    }

    pub fn with_nested(mut self, list: ListBlock) -> Self {
        self.nested.push(list);
        self
    }
}

impl ListBlock {
    pub fn unordered(items: Vec<ListItem>) -> Self {
        Self { ordered: false, start: None, items }
    }

    pub fn ordered(items: Vec<ListItem>) -> Self {
        Self { ordered: true, start: Some(1), items }
    }
}
