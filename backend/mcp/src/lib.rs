//! Minimal MCP (Model Context Protocol) server over stdio.
//!
//! Reads line-delimited JSON-RPC 2.0 from stdin and writes responses to
//! stdout. Tools come from a [`cardwire_core::ToolRegistry`]; logging must
//! go to stderr so stdout carries protocol frames only.

pub mod jsonrpc;
pub mod server;

pub use server::{McpServer, PROTOCOL_VERSION, SERVER_NAME};
