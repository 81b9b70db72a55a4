//! Backfill command - manual correction for a prior day

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

use crate::backfill::BackfillInput;
use crate::config::Settings;
use crate::pipeline;

/// Arguments for the backfill command
#[derive(Args)]
pub struct BackfillArgs {
    /// Target date (YYYY-MM-DD, default: yesterday in the configured timezone)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Member count for the target date
    #[arg(long)]
    pub members: String,

    /// Token price for the target date
    #[arg(long)]
    pub price: String,

    /// Token stock for the target date
    #[arg(long)]
    pub stock: String,
}

/// Execute the backfill command
pub async fn execute(args: BackfillArgs) -> Result<()> {
    let settings = Settings::load().unwrap_or_else(|_| Settings::default());
    let today = settings.today();

    let input = BackfillInput {
        target_date: args.date,
        members: Some(args.members),
        price: Some(args.price),
        stock: Some(args.stock),
    };

    pipeline::run_backfill_only(&settings, &input, today)?;
    Ok(())
}
