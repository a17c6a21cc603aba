//! Line-delimited MCP server loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use cardwire_core::ToolRegistry;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::jsonrpc::{
    invalid_params, method_not_found, parse_error, success_response, IncomingMessage, Response,
};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "cardwire";

pub struct McpServer {
    registry: Arc<ToolRegistry>,
    version: String,
}

impl McpServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Serve on the process's stdin/stdout until stdin closes.
    pub async fn run_stdio(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.run(stdin, stdout).await
    }

    /// Read one JSON-RPC message per line and write one response per request.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(version = %self.version, tools = self.registry.list().len(), "MCP server starting");
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await.context("reading request line")? {
            let Some(response) = self.handle_line(&line).await else {
                continue;
            };
            let mut json = serde_json::to_string(&response)?;
            json.push('\n');
            writer.write_all(json.as_bytes()).await.context("writing response")?;
            writer.flush().await?;
        }

        info!("stdin closed, MCP server exiting");
        Ok(())
    }

    /// Handle one raw line. Returns `None` for blank lines and notifications.
    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        debug!(request = %trimmed, "<-");

        let msg: IncomingMessage = match serde_json::from_str(trimmed) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("Parse error: {}", e);
                return Some(parse_error());
            }
        };

        let Some(method) = msg.method.as_deref() else {
            debug!("Ignoring message without method");
            return None;
        };
        let Some(id) = msg.id.clone() else {
            debug!(method, "Notification");
            return None;
        };

        Some(match method {
            "initialize" => success_response(id, self.initialize()),
            "ping" => success_response(id, json!({})),
            "tools/list" => success_response(id, self.tools_list()),
            "tools/call" => self.tools_call(id, msg.params).await,
            _ => method_not_found(id, method),
        })
    }

    fn initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": { "name": SERVER_NAME, "version": self.version },
        })
    }

    fn tools_list(&self) -> Value {
        json!({ "tools": self.registry.descriptors() })
    }

    async fn tools_call(&self, id: Value, params: Option<Value>) -> Response {
        let params = params.unwrap_or(Value::Null);
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return invalid_params(id, "tools/call requires a string 'name'");
        };
        let Some(tool) = self.registry.get(name) else {
            return invalid_params(id, format!("Unknown tool: {name}"));
        };
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        let result = match tool.execute(arguments).await {
            Ok(output) => tool_result(output),
            Err(e) => {
                error!(tool = name, "Tool failed: {:#}", e);
                json!({
                    "content": [{ "type": "text", "text": format!("Error: {e:#}") }],
                    "isError": true,
                })
            }
        };
        success_response(id, result)
    }
}

fn tool_result(output: Value) -> Value {
    let text = match &output {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };
    let mut result = json!({
        "content": [{ "type": "text", "text": text }],
        "isError": false,
    });
    if output.is_object() {
        result["structuredContent"] = output;
    }
    result
}
