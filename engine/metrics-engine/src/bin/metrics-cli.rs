//! # Metrics CLI Binary
//!
//! Command-line entry point for the player metrics pipeline.

use anyhow::Result;
use clap::Parser;
use metrics_engine::cli::{load_config, Cli, CliHandler};
use metrics_engine::logging::{initialize_logging, initialize_logging_with_config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    // RUST_LOG takes precedence over the configured level
    if std::env::var("RUST_LOG").is_ok() {
        initialize_logging()?;
    } else {
        let format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
        initialize_logging_with_config(&config.logging.level, format)?;
    }

    let handler = CliHandler::new(&cli, config).await?;
    handler.handle_command(cli.command).await?;

    Ok(())
}
