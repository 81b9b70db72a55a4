//! Daily run orchestration
//!
//! Drives one batch run end to end: manual backfill first, then the
//! scrape, delta computation, ledger persist, and finally the webhook
//! notification. Each stage's failure policy follows from what has
//! already been persisted: a corrupt ledger aborts before any write,
//! invalid backfill input aborts before touching the ledger, a scrape
//! failure keeps backfill work already saved, and a publish failure
//! never rolls back the ledger update.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::backfill::{BackfillInput, BackfillInputError, BackfillResolver};
use crate::config::Settings;
use crate::delta::{DailySnapshot, DeltaEngine};
use crate::ledger::{LedgerStore, Row, Source, StoreError};
use crate::provider::{ProviderError, StatsProvider};
use crate::publisher::Publisher;
use crate::report::format_report;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Backfill(#[from] BackfillInputError),

    #[error("scrape failed: {0}")]
    Scrape(#[from] ProviderError),
}

/// What a completed run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub snapshot: DailySnapshot,
    pub message: String,
    /// False when publishing was skipped or failed (both non-fatal).
    pub published: bool,
}

/// Execute one daily run for `today`.
///
/// `dry_run` skips the webhook post but still persists the ledger.
pub async fn run_daily(
    settings: &Settings,
    provider: &dyn StatsProvider,
    publisher: &dyn Publisher,
    backfill: &BackfillInput,
    today: NaiveDate,
    dry_run: bool,
) -> Result<RunOutcome, PipelineError> {
    let mut store = LedgerStore::load(&settings.ledger.path)?;
    info!(rows = store.len(), date = %today, "ledger loaded");

    BackfillResolver::apply(&mut store, backfill, today)?;

    let observation = provider.fetch_today(today).await?;
    info!(
        members = observation.members,
        price = %observation.price,
        stock = observation.stock,
        "scraped today's readings"
    );

    let snapshot = DeltaEngine::compute(&store, &observation);
    match snapshot.baseline_date {
        Some(baseline) => info!(%baseline, "computed day-over-day deltas"),
        None => info!("no row for the previous day; deltas unavailable"),
    }

    // Persisted regardless of whether deltas were computable.
    store.upsert(Row::from_observation(&observation, Source::Automated));
    store.save()?;

    let message = format_report(&snapshot, &settings.report);

    let published = if dry_run {
        info!("dry run, skipping webhook post");
        false
    } else {
        match publisher.send(&message).await {
            Ok(()) => true,
            Err(e) => {
                // Non-fatal: the ledger is already durable.
                error!(error = %e, "failed to deliver report");
                false
            }
        }
    };

    if !published && !dry_run {
        warn!("run completed with the notification undelivered");
    }

    Ok(RunOutcome {
        snapshot,
        message,
        published,
    })
}

/// Apply a manual correction without scraping or publishing.
///
/// Used by the `backfill` CLI command when the automated run was skipped
/// or produced wrong values for a prior day.
pub fn run_backfill_only(
    settings: &Settings,
    backfill: &BackfillInput,
    today: NaiveDate,
) -> Result<(), PipelineError> {
    let mut store = LedgerStore::load(&settings.ledger.path)?;
    match BackfillResolver::apply(&mut store, backfill, today)? {
        Some(obs) => info!(date = %obs.date, "backfill persisted"),
        None => warn!("no backfill values supplied, nothing to do"),
    }
    Ok(())
}
