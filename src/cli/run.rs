//! Run command - the daily pipeline

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use tracing::info;

use crate::backfill::BackfillInput;
use crate::config::Settings;
use crate::pipeline;
use crate::provider::FinancieProvider;
use crate::publisher::{DiscordPublisher, NullPublisher, Publisher, WebhookUrl};

/// Arguments for the run command
#[derive(Args)]
pub struct RunArgs {
    /// Override the run's "today" (YYYY-MM-DD); defaults to the current
    /// date in the configured timezone
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Skip the webhook post (ledger is still updated)
    #[arg(long)]
    pub dry_run: bool,

    /// Backfill target date (YYYY-MM-DD, default: yesterday)
    #[arg(long)]
    pub backfill_date: Option<NaiveDate>,

    /// Backfill member count
    #[arg(long)]
    pub members: Option<String>,

    /// Backfill token price
    #[arg(long)]
    pub price: Option<String>,

    /// Backfill token stock
    #[arg(long)]
    pub stock: Option<String>,
}

impl RunArgs {
    fn backfill_input(&self) -> BackfillInput {
        BackfillInput {
            target_date: self.backfill_date,
            members: self.members.clone(),
            price: self.price.clone(),
            stock: self.stock.clone(),
        }
    }
}

/// Execute the run command
pub async fn execute(args: RunArgs) -> Result<()> {
    let settings = Settings::load().unwrap_or_else(|_| Settings::default());
    let today = args.date.unwrap_or_else(|| settings.today());

    let provider = FinancieProvider::new(&settings.provider)?;
    let publisher: Box<dyn Publisher> = match &settings.publisher.webhook_url {
        Some(url) => Box::new(DiscordPublisher::new(WebhookUrl::new(url.clone()))),
        None => Box::new(NullPublisher),
    };

    let outcome = pipeline::run_daily(
        &settings,
        &provider,
        publisher.as_ref(),
        &args.backfill_input(),
        today,
        args.dry_run,
    )
    .await?;

    info!(published = outcome.published, "daily run finished");
    println!("{}", outcome.message);
    Ok(())
}
