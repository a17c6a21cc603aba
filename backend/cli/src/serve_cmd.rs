//! `cardwire serve`: MCP tool server on stdio.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use cardwire_config::{redact, CardwireConfig};
use cardwire_mcp::McpServer;
use logging::LogJanitor;
use tracing::info;

use crate::app;

pub async fn run(config: &CardwireConfig) -> Result<()> {
    let redacted = redact(config);
    info!(
        webhook = redacted.webhook.url.as_deref().unwrap_or("<mocked>"),
        image_validation = config.images.validate,
        log_dir = %config.logging.dir,
        "Starting cardwire MCP server"
    );

    let janitor = LogJanitor::spawn(
        PathBuf::from(&config.logging.dir),
        config.logging.retention_days,
        Duration::from_secs(config.logging.cleanup_interval_hours.max(1) * 3600),
    );

    let ctx = Arc::new(app::send_context(config)?);
    let server = McpServer::new(Arc::new(app::tool_registry(ctx)));
    let result = server.run_stdio().await;

    janitor.shutdown();
    info!("cardwire MCP server stopped");
    result
}
