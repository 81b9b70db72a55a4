//! Command-line interface
//!
//! Provides CLI commands for the stats tracker.

pub mod backfill;
pub mod run;
pub mod show;

use clap::{Parser, Subcommand};

/// Stats Tracker CLI
#[derive(Parser)]
#[command(name = "stats-tracker")]
#[command(about = "Daily community token stats: scrape, ledger, deltas, webhook report")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Execute the daily pipeline: backfill, scrape, persist, publish
    Run(run::RunArgs),
    /// Apply a manual correction for a prior day, without scraping
    Backfill(backfill::BackfillArgs),
    /// Print the ledger tail and the latest day-over-day deltas
    Show(show::ShowArgs),
}
