mod app;
mod clean_logs_cmd;
mod convert_cmd;
mod doctor_cmd;
mod mock_cmd;
mod send_cmd;
mod serve_cmd;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cardwire")]
#[command(about = "cardwire: markdown to Google Chat Cards V2, as a CLI and an MCP tool server")]
#[command(version)]
struct Cli {
    /// YAML config file (defaults to $CARDWIRE_CONFIG, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the Google Chat tools over MCP on stdin/stdout
    Serve,
    /// Convert markdown to Cards V2 JSON and print it
    Convert {
        /// Card header title
        #[arg(short, long)]
        title: Option<String>,
        /// Markdown file (stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Send markdown to the configured webhook once
    Send {
        /// Card header title
        #[arg(short, long)]
        title: Option<String>,
        /// Send the input as plain text instead of a card
        #[arg(long)]
        text: bool,
        /// Do not resend as plain text when the card fails
        #[arg(long)]
        no_fallback: bool,
        /// Markdown file (stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Run a local mock of the Google Chat webhook endpoint
    MockServer {
        /// Port to bind on 127.0.0.1
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
        /// Write the recorded requests to this JSON file on shutdown
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Delete log files older than the retention window
    CleanLogs,
    /// Validate the config and print it with secrets masked
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config =
        cardwire_config::load_and_prepare(cli.config.as_deref(), &cardwire_config::process_env())
            .await?;
    logging::init_logger(&config.logging.dir, &config.logging.level)?;

    let report = cardwire_config::validate(&config);
    cardwire_config::log_report(&report);
    if !report.is_valid() && !matches!(cli.command, Commands::Doctor) {
        bail!(
            "Invalid configuration ({} error(s)); run `cardwire doctor` for details",
            report.errors.len()
        );
    }

    match cli.command {
        Commands::Serve => serve_cmd::run(&config).await,
        Commands::Convert { title, file } => {
            convert_cmd::run(&config, title.as_deref(), file.as_deref()).await
        }
        Commands::Send {
            title,
            text,
            no_fallback,
            file,
        } => {
            let options = send_cmd::SendArgs {
                title,
                plain_text: text,
                no_fallback,
            };
            send_cmd::run(&config, options, file.as_deref()).await
        }
        Commands::MockServer { port, save } => mock_cmd::run(port, save).await,
        Commands::CleanLogs => clean_logs_cmd::run(&config).await,
        Commands::Doctor => doctor_cmd::run(&config, &report),
    }
}
