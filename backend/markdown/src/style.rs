//! Inline style transformer
//!
//! Rewrites Markdown inline markup into the HTML subset Google Chat renders
//! inside a `textParagraph`. The rewrite order is fixed: strip raw tags,
//! links, bold, italic, code, strikethrough. Bold runs before italic so the
//! `*` pairs of `**x**` are consumed first.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::token::Inline;

static RAW_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[^>]+(?:>|$)").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());
static HREF: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href="([^"]*)""#).unwrap());
static HREF_SLOT: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href="\x00(\d+)\x00""#).unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static ITALIC_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static ITALIC_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_([^_]+)_").unwrap());
static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static STRIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~([^~]+)~~").unwrap());

/// Apply every inline rewrite, in order.
pub fn transform_inline(text: &str) -> String {
    let text = strip_tags(text);
    let text = rewrite_links(&text);
    rewrite_emphasis(&text)
}

/// Render one inline token of a paragraph or list item.
///
/// Autolinks (`<https://...>`) look like raw tags, so they become anchors
/// directly instead of going through [`transform_inline`]. Inline HTML only
/// has its tags stripped.
pub fn render_inline(inline: &Inline) -> String {
    match inline {
        Inline::Link { raw, href } if raw.starts_with('<') => {
            format!("<a href=\"{href}\">{href}</a>")
        }
        Inline::Image { href, alt } => {
            let label = if alt.trim().is_empty() { href } else { alt };
            format!("<a href=\"{href}\">{label}</a>")
        }
        Inline::Other { raw } => strip_tags(raw),
        styled => styled.raw().map(transform_inline).unwrap_or_default(),
    }
}

/// Remove embedded HTML-ish tags, including an unterminated trailing one.
pub fn strip_tags(text: &str) -> String {
    RAW_TAG.replace_all(text, "").into_owned()
}

/// `[label](url)` → `<a href="url">label</a>`.
pub fn rewrite_links(text: &str) -> String {
    LINK.replace_all(text, r#"<a href="${2}">${1}</a>"#).into_owned()
}

/// Bold, italic, code and strikethrough rewrites. Anchor targets are set
/// aside first so `_` or `*` inside a URL is never read as emphasis.
pub fn rewrite_emphasis(text: &str) -> String {
    let mut hrefs = Vec::new();
    let text = HREF.replace_all(text, |caps: &Captures| {
        hrefs.push(caps[1].to_string());
        format!("href=\"\u{0}{}\u{0}\"", hrefs.len() - 1)
    });

    let text = BOLD.replace_all(&text, "<b>${1}</b>");
    let text = ITALIC_STAR.replace_all(&text, "<i>${1}</i>");
    let text = ITALIC_UNDERSCORE.replace_all(&text, "<i>${1}</i>");
    let text = CODE.replace_all(&text, "<code>${1}</code>");
    let text = STRIKE.replace_all(&text, "<s>${1}</s>");

    HREF_SLOT
        .replace_all(&text, |caps: &Captures| {
            let href = caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| hrefs.get(i))
                .map(String::as_str)
                .unwrap_or_default();
            format!("href=\"{href}\"")
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_before_italic() {
        assert_eq!(transform_inline("**bold** and *it*"), "<b>bold</b> and <i>it</i>");
    }

    #[test]
    fn underscore_italic_code_and_strike() {
        assert_eq!(
            transform_inline("_a_ `b` ~~c~~"),
            "<i>a</i> <code>b</code> <s>c</s>"
        );
    }

    #[test]
    fn links_become_anchors() {
        assert_eq!(
            transform_inline("see [docs](https://example.com/a_b_c)"),
            r#"see <a href="https://example.com/a_b_c">docs</a>"#
        );
    }

    #[test]
    fn emphasis_inside_link_label() {
        assert_eq!(
            transform_inline("**[x](https://e.test/*y*)**"),
            r#"<b><a href="https://e.test/*y*">x</a></b>"#
        );
    }

    #[test]
    fn raw_tags_are_stripped_first() {
        assert_eq!(transform_inline("<span>hi</span> <b"), "hi ");
        assert_eq!(transform_inline("a <br> **b**"), "a  <b>b</b>");
    }

    #[test]
    fn autolink_becomes_anchor_with_url_label() {
        let link = Inline::Link {
            raw: "<https://example.com/a_b>".into(),
            href: "https://example.com/a_b".into(),
        };
        assert_eq!(
            render_inline(&link),
            r#"<a href="https://example.com/a_b">https://example.com/a_b</a>"#
        );
    }

    #[test]
    fn bracket_link_goes_through_transform() {
        let link = Inline::Link {
            raw: "[**docs**](https://x.test)".into(),
            href: "https://x.test".into(),
        };
        assert_eq!(render_inline(&link), r#"<a href="https://x.test"><b>docs</b></a>"#);
    }

    #[test]
    fn inline_html_is_stripped_and_images_link_out() {
        assert_eq!(render_inline(&Inline::Other { raw: "<kbd>".into() }), "");
        let image = Inline::Image { href: "https://x.test/a.png".into(), alt: String::new() };
        assert_eq!(
            render_inline(&image),
            r#"<a href="https://x.test/a.png">https://x.test/a.png</a>"#
        );
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(transform_inline("just text, 2 * 3"), "just text, 2 * 3");
    }
}
