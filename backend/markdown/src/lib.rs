//! Markdown → Google Chat Cards V2
//!
//! Lexes chat-flavoured markdown and renders it into the two widget shapes
//! a Cards V2 `textParagraph`/`image` section understands. Images are the
//! only blocks that need I/O; everything else renders synchronously.

pub mod converter;
pub mod image;
pub mod lexer;
pub mod renderer;
pub mod style;
pub mod token;

pub use converter::MarkdownConverter;
pub use image::{normalize_image_url, ImageResolver};
pub use lexer::lex;
pub use style::{render_inline, transform_inline};
pub use token::{Inline, ListBlock, ListItem, Token};
