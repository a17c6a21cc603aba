pub mod message_tool;
pub mod pipeline;

pub use message_tool::{register_google_chat_tools, SendCardsV2Tool, SendMarkdownTool, SendTextTool};
pub use pipeline::{send_markdown, SendContext, SendMarkdownOptions, SendMarkdownResult};
