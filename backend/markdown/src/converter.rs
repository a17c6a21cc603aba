//! Markdown → Cards V2 converter
//!
//! Lexes the input, dispatches every block token to its renderer and wraps
//! the resulting widgets into a single card envelope.

use std::sync::Arc;

use cardwire_core::{
    Card, CardEnvelope, CardwireError, EventObserver, ImageValidator, NullObserver, Section,
    Widget,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::image::ImageResolver;
use crate::lexer::lex;
use crate::renderer::{render_code, render_heading, render_list, render_table};
use crate::style::render_inline;
use crate::token::{Inline, Token};

static INLINE_IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

pub struct MarkdownConverter {
    validator: Arc<dyn ImageValidator>,
    observer: Arc<dyn EventObserver>,
}

impl MarkdownConverter {
    pub fn new(validator: Arc<dyn ImageValidator>) -> Self {
        Self {
            validator,
            observer: Arc::new(NullObserver),
        }
    }

    /// Report degraded images to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn EventObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Convert markdown into exactly one card envelope.
    ///
    /// A blank `card_title` is treated as absent. Fails with
    /// [`CardwireError::EmptyInput`] before lexing when `markdown` is blank.
    pub async fn convert(
        &self,
        markdown: &str,
        card_title: Option<&str>,
    ) -> Result<Vec<CardEnvelope>, CardwireError> {
        if markdown.trim().is_empty() {
            return Err(CardwireError::EmptyInput);
        }

        let tokens = lex(markdown);
        debug!(tokens = tokens.len(), "Markdown lexed");

        let mut widgets = self.render_tokens(&tokens).await;
        if widgets.is_empty() {
            widgets.push(Widget::text(markdown.trim()));
        }

        let title = card_title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let card = Card::new(title, vec![Section::new(widgets)?])?;
        Ok(vec![CardEnvelope::new(card)])
    }

    /// Render block tokens in document order.
    pub async fn render_tokens(&self, tokens: &[Token]) -> Vec<Widget> {
        let images = ImageResolver::new(self.validator.clone(), self.observer.clone());
        let mut widgets = Vec::with_capacity(tokens.len());

        for token in tokens {
            match token {
                Token::Heading { depth, text } => widgets.push(render_heading(*depth, text)),
                Token::Paragraph { text, tokens } => {
                    widgets.extend(split_paragraph(&images, text, tokens).await);
                }
                Token::List(list) => widgets.push(render_list(list)),
                Token::Image { href, alt } => widgets.push(images.resolve(href, alt).await),
                Token::Code { lang, text } => widgets.push(render_code(lang, text)),
                Token::Table { header, rows } => widgets.push(render_table(header, rows)),
                Token::Space => {}
                Token::Other { raw, .. } => widgets.push(Widget::text(raw.clone())),
            }
        }

        widgets
    }
}

/// Split a paragraph at every inline image that resolves to an image widget.
///
/// A degraded image is a text placeholder and stays in the running text.
async fn split_paragraph(images: &ImageResolver, text: &str, tokens: &[Inline]) -> Vec<Widget> {
    let scanned;
    let tokens = if tokens.is_empty() {
        scanned = scan_inline_images(text);
        scanned.as_slice()
    } else {
        tokens
    };

    let mut out = Vec::new();
    let mut buffer = String::new();
    for token in tokens {
        match token {
            Inline::Image { href, alt } => match images.resolve(href, alt).await {
                Widget::TextParagraph(placeholder) => buffer.push_str(&placeholder.text),
                image => {
                    flush(&mut buffer, &mut out);
                    out.push(image);
                }
            },
            inline => buffer.push_str(&render_inline(inline)),
        }
    }
    flush(&mut buffer, &mut out);
    out
}

fn flush(buffer: &mut String, out: &mut Vec<Widget>) {
    if !buffer.trim().is_empty() {
        out.push(Widget::text(std::mem::take(buffer)));
    }
    buffer.clear();
}

/// Inline tokens for a paragraph that only carries flat text.
fn scan_inline_images(text: &str) -> Vec<Inline> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for caps in INLINE_IMAGE.captures_iter(text) {
        let (Some(whole), Some(alt), Some(href)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        if whole.start() > last {
            tokens.push(Inline::text(&text[last..whole.start()]));
        }
        tokens.push(Inline::Image {
            href: href.as_str().trim().to_string(),
            alt: alt.as_str().to_string(),
        });
        last = whole.end();
    }
    if last < text.len() {
        tokens.push(Inline::text(&text[last..]));
    }
    tokens
}
