//! `cardwire mock-server`: a local stand-in for the Google Chat webhook.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cardwire_channels::MockWebhookServer;
use tracing::info;

pub async fn run(port: u16, save: Option<PathBuf>) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let server = MockWebhookServer::start(addr).await?;

    eprintln!("Mock webhook listening on {}", server.url());
    eprintln!("Set GOOGLE_CHAT_WEBHOOK_URL={} to send here. Ctrl-C to stop.", server.url());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    if let Some(path) = save {
        let count = server.save_requests(&path).await?;
        info!(count, path = %path.display(), "Saved recorded requests");
    }
    server.shutdown().await
}
