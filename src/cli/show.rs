//! Show command - inspect the ledger tail

use anyhow::Result;
use clap::Args;

use crate::config::Settings;
use crate::delta::DeltaEngine;
use crate::ledger::{LedgerStore, Observation, PRICE_SCALE};
use crate::report::format_report;

/// Arguments for the show command
#[derive(Args)]
pub struct ShowArgs {
    /// Number of trailing rows to print
    #[arg(long, default_value_t = 7)]
    pub limit: usize,
}

/// Execute the show command
pub async fn execute(args: ShowArgs) -> Result<()> {
    let settings = Settings::load().unwrap_or_else(|_| Settings::default());
    let store = LedgerStore::load(&settings.ledger.path)?;

    if store.is_empty() {
        println!("ledger is empty");
        return Ok(());
    }

    println!("date        members     price       stock");
    let skip = store.len().saturating_sub(args.limit);
    for row in &store.rows()[skip..] {
        let price = format!("{:.prec$}", row.price, prec = PRICE_SCALE as usize);
        println!(
            "{}  {:>9}  {:>10}  {:>9}",
            row.date, row.members, price, row.stock
        );
    }

    // Re-derive the latest day's report from what is already persisted.
    let latest = store.rows().last().expect("non-empty ledger has a last row");
    let obs = Observation::new(latest.date, latest.members, latest.price, latest.stock);
    let snapshot = DeltaEngine::compute(&store, &obs);
    println!();
    println!("{}", format_report(&snapshot, &settings.report));
    Ok(())
}
