//! Block renderers
//!
//! Pure token → `textParagraph` renderers for headings, code blocks, lists
//! and tables. Paragraphs and images live in the converter because they may
//! split into several widgets or need I/O.

use cardwire_core::Widget;

use crate::style::{render_inline, transform_inline};
use crate::token::{ListBlock, ListItem};

/// Top-level unordered bullet.
pub const SOLID_BULLET: &str = "• ";
/// Bullet for every nested depth, ordered or not.
pub const HOLLOW_BULLET: &str = "◦ ";
/// Indent unit; two per nesting level.
pub const WIDE_SPACE: char = '\u{2003}';
/// Minimum rendered column width of a table.
pub const MIN_COLUMN_WIDTH: usize = 4;

pub fn render_heading(depth: u8, text: &str) -> Widget {
    let marks = "#".repeat(depth.clamp(1, 6) as usize);
    Widget::text(format!("\n<b>{marks} {text}</b>\n"))
}

pub fn render_code(lang: &str, text: &str) -> Widget {
    Widget::text(format!("```{lang}\n{text}\n```"))
}

/// Flatten a possibly nested list into one indented, multi-line paragraph.
///
/// Only depth-0 items of an ordered list are numbered; the counter ignores
/// nested items entirely.
pub fn render_list(list: &ListBlock) -> Widget {
    let mut lines = Vec::new();
    let mut number = 0usize;
    for item in &list.items {
        let marker = if list.ordered {
            number += 1;
            format!("{number}. ")
        } else {
            SOLID_BULLET.to_string()
        };
        flatten_item(item, 0, &marker, &mut lines);
    }
    Widget::text(lines.join("\n"))
}

fn flatten_item(item: &ListItem, depth: usize, marker: &str, lines: &mut Vec<String>) {
    let indent: String = std::iter::repeat(WIDE_SPACE).take(depth * 2).collect();
    let text = if item.tokens.is_empty() {
        transform_inline(&item.text)
    } else {
        item.tokens.iter().map(render_inline).collect()
    };
    lines.push(format!("{indent}{marker}{}", text.trim()));

    for nested in &item.nested {
        for child in &nested.items {
            flatten_item(child, depth + 1, HOLLOW_BULLET, lines);
        }
    }
}

/// Render a table as a fenced, fixed-width block.
pub fn render_table(header: &[String], rows: &[Vec<String>]) -> Widget {
    if header.is_empty() {
        return Widget::text("(empty table)");
    }

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(idx, head)| {
            rows.iter()
                .map(|row| row.get(idx).map_or(0, |cell| cell.chars().count()))
                .chain([head.chars().count(), MIN_COLUMN_WIDTH])
                .max()
                .unwrap_or(MIN_COLUMN_WIDTH)
        })
        .collect();

    let render_row = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| match widths.get(idx) {
                Some(&width) => format!("{cell:<width$}"),
                None => cell.clone(),
            })
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let separator = widths
        .iter()
        .map(|&w| "-".repeat(w))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut lines = vec![render_row(header), separator];
    lines.extend(rows.iter().map(|row| render_row(row)));
    Widget::text(format!("```\n{}\n```", lines.join("\n")))
}
