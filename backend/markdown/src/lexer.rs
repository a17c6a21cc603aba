//! Markdown lexer
//!
//! Walks the `pulldown-cmark` offset event stream and folds it into the
//! [`Token`] model. Source ranges are kept so inline tokens carry the exact
//! markup the user wrote.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use crate::token::{Inline, ListBlock, ListItem, Token};

/// Tokenize markdown into block tokens, in document order.
pub fn lex(markdown: &str) -> Vec<Token> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events: Vec<(Event<'_>, Range<usize>)> =
        Parser::new_ext(markdown, options).into_offset_iter().collect();

    let newlines = markdown.match_indices('\n').map(|(at, _)| at).collect();

    Lexer { src: markdown, events, newlines }.blocks()
}

struct Lexer<'a> {
    src: &'a str,
    events: Vec<(Event<'a>, Range<usize>)>,
    /// Byte offsets of every `\n` in `src`, ascending.
    newlines: Vec<usize>,
}

/// Bounds of a `Start ... End` container within the event list.
struct Container {
    inner: Range<usize>,
    next: usize,
    span: Range<usize>,
}

impl<'a> Lexer<'a> {
    fn blocks(&self) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut last_end: Option<usize> = None;
        let mut i = 0;

        while i < self.events.len() {
            let start = self.events[i].1.start;
            if let Some(end) = last_end {
                if self.blank_line_between(end, start) {
                    tokens.push(Token::Space);
                }
            }
            let (token, next, end) = self.block(i);
            if let Some(token) = token {
                tokens.push(token);
            }
            last_end = Some(end);
            i = next;
        }
        tokens
    }

    /// Returns the token at `i`, the index after it, and its source end.
    fn block(&self, i: usize) -> (Option<Token>, usize, usize) {
        match &self.events[i].0 {
            Event::Start(Tag::Heading(level, _, _)) => {
                let c = self.container(i);
                let text = self.inner_source(&c.inner);
                (Some(Token::Heading { depth: *level as u8, text }), c.next, c.span.end)
            }
            Event::Start(Tag::Paragraph) => {
                let c = self.container(i);
                let token = Token::Paragraph {
                    text: self.inner_source(&c.inner),
                    tokens: self.inlines(c.inner.clone()),
                };
                (Some(token), c.next, c.span.end)
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let c = self.container(i);
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or_default().to_string()
                    }
                    CodeBlockKind::Indented => String::new(),
                };
                let mut text: String = self.events[c.inner.clone()]
                    .iter()
                    .filter_map(|(event, _)| match event {
                        Event::Text(t) => Some(&**t),
                        _ => None,
                    })
                    .collect();
                if text.ends_with('\n') {
                    text.pop();
                }
                (Some(Token::Code { lang, text }), c.next, c.span.end)
            }
            Event::Start(Tag::List(start)) => {
                let c = self.container(i);
                let list = self.list(*start, c.inner.clone());
                (Some(Token::List(list)), c.next, c.span.end)
            }
            Event::Start(Tag::Table(_)) => {
                let c = self.container(i);
                (Some(self.table(c.inner.clone())), c.next, c.span.end)
            }
            Event::Start(tag) => {
                let kind = match tag {
                    Tag::BlockQuote => "blockquote",
                    Tag::FootnoteDefinition(_) => "footnote",
                    _ => "unknown",
                };
                let c = self.container(i);
                let raw = self.src[c.span.clone()].to_string();
                (Some(Token::Other { kind: kind.to_string(), raw }), c.next, c.span.end)
            }
            Event::Html(_) => {
                // HTML blocks arrive as one event per line.
                let mut j = i;
                while j + 1 < self.events.len() && matches!(self.events[j + 1].0, Event::Html(_)) {
                    j += 1;
                }
                let span = self.events[i].1.start..self.events[j].1.end;
                let raw = self.src[span.clone()].to_string();
                (Some(Token::Other { kind: "html".into(), raw }), j + 1, span.end)
            }
            Event::Rule => {
                let span = self.events[i].1.clone();
                let raw = self.src[span.clone()].to_string();
                (Some(Token::Other { kind: "hr".into(), raw }), i + 1, span.end)
            }
            Event::End(_) => (None, i + 1, self.events[i].1.end),
            _ => {
                let span = self.events[i].1.clone();
                let raw = self.src[span.clone()].to_string();
                (Some(Token::Other { kind: "text".into(), raw }), i + 1, span.end)
            }
        }
    }

    fn list(&self, start: Option<u64>, inner: Range<usize>) -> ListBlock {
        let mut items = Vec::new();
        let mut i = inner.start;
        while i < inner.end {
            if let Event::Start(Tag::Item) = self.events[i].0 {
                let c = self.container(i);
                items.push(self.item(c.inner.clone()));
                i = c.next;
            } else {
                i += 1;
            }
        }
        ListBlock { ordered: start.is_some(), start, items }
    }

    fn item(&self, inner: Range<usize>) -> ListItem {
        let mut tokens = Vec::new();
        let mut nested = Vec::new();
        let mut run_start: Option<usize> = None;
        let mut i = inner.start;

        while i < inner.end {
            match &self.events[i].0 {
                Event::Start(Tag::Paragraph) => {
                    self.flush_run(&mut run_start, i, &mut tokens);
                    let c = self.container(i);
                    if !tokens.is_empty() {
                        tokens.push(Inline::text("\n"));
                    }
                    tokens.extend(self.inlines(c.inner.clone()));
                    i = c.next;
                }
                Event::Start(Tag::List(start)) => {
                    self.flush_run(&mut run_start, i, &mut tokens);
                    let c = self.container(i);
                    nested.push(self.list(*start, c.inner.clone()));
                    i = c.next;
                }
                Event::Start(
                    Tag::CodeBlock(_) | Tag::BlockQuote | Tag::Heading(..) | Tag::Table(_),
                ) => {
                    self.flush_run(&mut run_start, i, &mut tokens);
                    i = self.container(i).next;
                }
                Event::Start(_) => {
                    run_start.get_or_insert(i);
                    i = self.container(i).next;
                }
                _ => {
                    run_start.get_or_insert(i);
                    i += 1;
                }
            }
        }
        self.flush_run(&mut run_start, inner.end, &mut tokens);

        let text: String = tokens.iter().filter_map(Inline::raw).collect();
        ListItem { text: text.trim().to_string(), tokens, nested }
    }

    /// Emit the pending run of inline events `run_start..end` of a tight list item.
    fn flush_run(&self, run_start: &mut Option<usize>, end: usize, tokens: &mut Vec<Inline>) {
        if let Some(start) = run_start.take() {
            tokens.extend(self.inlines(start..end));
        }
    }

    fn table(&self, inner: Range<usize>) -> Token {
        let mut header = Vec::new();
        let mut rows = Vec::new();
        let mut i = inner.start;
        while i < inner.end {
            match self.events[i].0 {
                Event::Start(Tag::TableHead) => {
                    let c = self.container(i);
                    header = self.cells(c.inner.clone());
                    i = c.next;
                }
                Event::Start(Tag::TableRow) => {
                    let c = self.container(i);
                    rows.push(self.cells(c.inner.clone()));
                    i = c.next;
                }
                _ => i += 1,
            }
        }
        Token::Table { header, rows }
    }

    fn cells(&self, inner: Range<usize>) -> Vec<String> {
        let mut cells = Vec::new();
        let mut i = inner.start;
        while i < inner.end {
            if let Event::Start(Tag::TableCell) = self.events[i].0 {
                let c = self.container(i);
                cells.push(self.inner_source(&c.inner).trim().to_string());
                i = c.next;
            } else {
                i += 1;
            }
        }
        cells
    }

    /// Fold the events in `range` into inline tokens. Source between two
    /// adjacent inlines (escapes, continuation indentation) becomes text.
    fn inlines(&self, range: Range<usize>) -> Vec<Inline> {
        let mut out = Vec::new();
        let mut cursor: Option<usize> = None;
        let mut i = range.start;

        while i < range.end {
            let span = self.events[i].1.clone();
            if let Some(c) = cursor {
                if span.start > c {
                    out.push(Inline::text(&self.src[c..span.start]));
                }
            }
            let (inline, next, end) = self.inline(i);
            out.push(inline);
            cursor = Some(end.max(cursor.unwrap_or(0)));
            i = next;
        }
        out
    }

    fn inline(&self, i: usize) -> (Inline, usize, usize) {
        let span = self.events[i].1.clone();
        let raw = self.src[span.clone()].to_string();
        match &self.events[i].0 {
            Event::Text(_) | Event::SoftBreak | Event::HardBreak => {
                (Inline::Text { raw }, i + 1, span.end)
            }
            Event::Code(_) => (Inline::Codespan { raw }, i + 1, span.end),
            Event::Start(tag) => {
                let c = self.container(i);
                let raw = self.src[c.span.clone()].to_string();
                let inline = match tag {
                    Tag::Strong => Inline::Strong { raw },
                    Tag::Emphasis => Inline::Em { raw },
                    Tag::Strikethrough => Inline::Strikethrough { raw },
                    Tag::Link(_, href, _) => Inline::Link { raw, href: href.to_string() },
                    Tag::Image(_, href, _) => Inline::Image {
                        href: href.to_string(),
                        alt: self.plain_text(c.inner.clone()),
                    },
                    _ => Inline::Other { raw },
                };
                (inline, c.next, c.span.end)
            }
            _ => (Inline::Other { raw }, i + 1, span.end),
        }
    }

    /// Concatenated text content of the events in `range`, markup removed.
    fn plain_text(&self, range: Range<usize>) -> String {
        self.events[range]
            .iter()
            .filter_map(|(event, _)| match event {
                Event::Text(t) | Event::Code(t) => Some(t.to_string()),
                Event::SoftBreak | Event::HardBreak => Some(" ".to_string()),
                _ => None,
            })
            .collect()
    }

    /// Source text spanned by the events in `range`.
    fn inner_source(&self, range: &Range<usize>) -> String {
        if range.is_empty() {
            return String::new();
        }
        let start = self.events[range.start].1.start;
        let end = self.events[range.clone()]
            .iter()
            .map(|(_, span)| span.end)
            .max()
            .unwrap_or(start);
        self.src[start..end].to_string()
    }

    /// Locate the `End` matching the `Start` at `i`.
    fn container(&self, i: usize) -> Container {
        let mut depth = 0usize;
        let mut j = i;
        while j < self.events.len() {
            match self.events[j].0 {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            j += 1;
        }
        Container {
            inner: i + 1..j.min(self.events.len()),
            next: j + 1,
            span: self.events[i].1.clone(),
        }
    }

    fn blank_line_between(&self, prev_end: usize, next_start: usize) -> bool {
        if prev_end == 0 || next_start <= prev_end {
            return false;
        }
        self.line_of(next_start) > self.line_of(prev_end - 1) + 1
    }

    /// Zero-based line number of byte offset `pos`.
    fn line_of(&self, pos: usize) -> usize {
        self.newlines.partition_point(|&nl| nl < pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(markdown: &str) -> Vec<Token> {
        lex(markdown).into_iter().filter(|t| *t != Token::Space).collect()
    }

    #[test]
    fn lexes_heading_and_paragraph() {
        let tokens = lex("# Title\n\nBody text");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], Token::Heading { depth: 1, text: "Title".into() });
        assert_eq!(tokens[1], Token::Space);
        match &tokens[2] {
            Token::Paragraph { text, tokens } => {
                assert_eq!(text, "Body text");
                assert_eq!(tokens, &vec![Inline::text("Body text")]);
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn inline_tokens_keep_raw_markup() {
        let tokens = blocks("Some **bold** and [link](https://x.test) and `code`");
        let Token::Paragraph { tokens, .. } = &tokens[0] else {
            panic!("expected paragraph");
        };
        assert!(tokens.contains(&Inline::Strong { raw: "**bold**".into() }));
        assert!(tokens.contains(&Inline::Link {
            raw: "[link](https://x.test)".into(),
            href: "https://x.test".into()
        }));
        assert!(tokens.contains(&Inline::Codespan { raw: "`code`".into() }));
        let joined: String = tokens.iter().filter_map(Inline::raw).collect();
        assert_eq!(joined, "Some **bold** and [link](https://x.test) and `code`");
    }

    #[test]
    fn inline_image_is_split_out() {
        let tokens = blocks("before ![alt text](https://x.test/a.png) after");
        let Token::Paragraph { tokens, .. } = &tokens[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(tokens.len(), 3);
        assert_eq!(
            tokens[1],
            Inline::Image { href: "https://x.test/a.png".into(), alt: "alt text".into() }
        );
    }

    #[test]
    fn nested_list_items_exclude_child_text() {
        let tokens = blocks("- A\n  - A1\n    - A1a\n- B");
        let Token::List(list) = &tokens[0] else {
            panic!("expected list");
        };
        assert!(!list.ordered);
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].text, "A");
        assert_eq!(list.items[0].nested[0].items[0].text, "A1");
        assert_eq!(list.items[0].nested[0].items[0].nested[0].items[0].text, "A1a");
        assert_eq!(list.items[1].text, "B");
        assert!(list.items[1].nested.is_empty());
    }

    #[test]
    fn ordered_list_records_start() {
        let tokens = blocks("3. three\n4. four");
        let Token::List(list) = &tokens[0] else {
            panic!("expected list");
        };
        assert!(list.ordered);
        assert_eq!(list.start, Some(3));
        assert_eq!(list.items[1].text, "four");
    }

    #[test]
    fn fenced_code_strips_trailing_newline() {
        let tokens = blocks("```rust\nfn main() {}\n```");
        assert_eq!(
            tokens[0],
            Token::Code { lang: "rust".into(), text: "fn main() {}".into() }
        );
    }

    #[test]
    fn table_collects_raw_cells() {
        let tokens = blocks("| 이름 | 나이 |\n|------|------|\n| 홍길동 | 30 |");
        assert_eq!(
            tokens[0],
            Token::Table {
                header: vec!["이름".into(), "나이".into()],
                rows: vec![vec!["홍길동".into(), "30".into()]],
            }
        );
    }

    #[test]
    fn unsupported_blocks_keep_source() {
        let tokens = blocks("> quoted\n\n---");
        match &tokens[0] {
            Token::Other { kind, raw } => {
                assert_eq!(kind, "blockquote");
                assert_eq!(raw.trim_end(), "> quoted");
            }
            other => panic!("expected blockquote, got {other:?}"),
        }
        assert!(matches!(&tokens[1], Token::Other { kind, .. } if kind == "hr"));
    }

    #[test]
    fn blank_lines_between_blocks_become_space() {
        let tokens = lex("a\n\nb\n\n\n\nc\n# h");
        let kinds: Vec<&str> = tokens
            .iter()
            .map(|t| match t {
                Token::Paragraph { .. } => "p",
                Token::Heading { .. } => "h",
                Token::Space => "space",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["p", "space", "p", "space", "p", "h"]);
    }

    #[test]
    fn long_documents_keep_one_space_per_gap() {
        let markdown = vec!["para"; 500].join("\n\n");
        let tokens = lex(&markdown);
        assert_eq!(tokens.len(), 999);
        assert_eq!(tokens.iter().filter(|t| **t == Token::Space).count(), 499);
    }

    #[test]
    fn line_numbers_come_from_newline_offsets() {
        let lexer = Lexer { src: "ab\ncd\n\nef", events: Vec::new(), newlines: vec![2, 5, 6] };
        assert_eq!(lexer.line_of(0), 0);
        assert_eq!(lexer.line_of(2), 0);
        assert_eq!(lexer.line_of(3), 1);
        assert_eq!(lexer.line_of(7), 3);
        assert!(lexer.blank_line_between(5, 7));
        assert!(!lexer.blank_line_between(2, 3));
    }
}
