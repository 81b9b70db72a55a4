//! Provider trait definitions
//!
//! The pipeline treats scraping as a black box that either yields a full
//! observation for the requested date or fails. Any failure aborts the
//! automated-write path only; manual backfill work already saved is kept.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::ledger::Observation;

/// Provider error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("page unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("expected value not found on page: {field}")]
    ValueNotFound { field: &'static str },

    #[error("unparseable {field} on page: '{value}'")]
    Parse { field: &'static str, value: String },
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Source of today's raw readings.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Fetch the readings for `date` (the run's "today").
    async fn fetch_today(&self, date: NaiveDate) -> ProviderResult<Observation>;
}
