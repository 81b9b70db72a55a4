//! Stats Tracker CLI
//!
//! Provides commands for:
//! - `run`: Execute the daily pipeline (backfill, scrape, persist, publish)
//! - `backfill`: Apply a manual correction for a prior day
//! - `show`: Print the ledger tail and latest deltas

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stats_tracker::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("stats_tracker=info".parse()?))
        .init();

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    match cli.command {
        Commands::Run(args) => {
            stats_tracker::cli::run::execute(args).await?;
        }
        Commands::Backfill(args) => {
            stats_tracker::cli::backfill::execute(args).await?;
        }
        Commands::Show(args) => {
            stats_tracker::cli::show::execute(args).await?;
        }
    }

    Ok(())
}
