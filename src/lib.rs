//! # Stats Tracker
//!
//! Daily community token statistics pipeline.
//!
//! Once per day the tracker scrapes a community page for three readings
//! (member count, token price, token stock), reconciles them against a
//! durable date-keyed ledger, computes day-over-day deltas, and posts a
//! formatted summary to a chat webhook.
//!
//! ## Architecture
//!
//! The core is the ledger update and delta engine:
//!
//! - [`ledger::LedgerStore`]: the durable date-keyed table with
//!   last-write-wins upsert and atomic save semantics.
//! - [`backfill::BackfillResolver`]: merges an operator-supplied
//!   correction for a prior day before the main computation.
//! - [`delta::DeltaEngine`]: selects the previous-day baseline and
//!   computes signed deltas, or marks them unavailable.
//!
//! Scraping and webhook delivery sit behind the pluggable
//! [`provider::StatsProvider`] and [`publisher::Publisher`] traits so the
//! pipeline can run against mocks in tests.

pub mod backfill;
pub mod cli;
pub mod config;
pub mod delta;
pub mod ledger;
pub mod pipeline;
pub mod provider;
pub mod publisher;
pub mod report;

// Re-export commonly used types
pub use backfill::{BackfillInput, BackfillInputError, BackfillResolver};
pub use config::Settings;
pub use delta::{DailySnapshot, DeltaEngine, MetricDeltas};
pub use ledger::{LedgerStore, Observation, Row, Source, StoreError};
pub use provider::{ProviderError, ProviderResult, StatsProvider};
pub use publisher::{PublishError, Publisher};
