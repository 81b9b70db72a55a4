//! Ledger row and observation types

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Price values are stored with a fixed number of fractional digits.
pub const PRICE_SCALE: u32 = 4;

/// Origin of a ledger row.
///
/// Kept in memory to resolve override precedence within a run; not
/// persisted, since the overwrite policy is enforced purely by date key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Written by the daily scrape.
    Automated,
    /// Written by an operator backfill.
    Manual,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Automated => write!(f, "automated"),
            Source::Manual => write!(f, "manual"),
        }
    }
}

/// One calendar date's recorded metrics.
///
/// `date` is the primary key; the ledger holds at most one row per date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub date: NaiveDate,
    pub members: u64,
    pub price: Decimal,
    pub stock: u64,
    pub source: Source,
}

impl Row {
    /// Create a row, normalizing the price to the fixed scale.
    pub fn new(date: NaiveDate, members: u64, price: Decimal, stock: u64, source: Source) -> Self {
        Self {
            date,
            members,
            price: price.round_dp(PRICE_SCALE),
            stock,
            source,
        }
    }

    /// Build the row an observation would persist as.
    pub fn from_observation(obs: &Observation, source: Source) -> Self {
        Self::new(obs.date, obs.members, obs.price, obs.stock, source)
    }
}

/// An unpersisted candidate reading, either freshly scraped or manually
/// supplied. Origin is known from the writer, not carried here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub date: NaiveDate,
    pub members: u64,
    pub price: Decimal,
    pub stock: u64,
}

impl Observation {
    pub fn new(date: NaiveDate, members: u64, price: Decimal, stock: u64) -> Self {
        Self {
            date,
            members,
            price: price.round_dp(PRICE_SCALE),
            stock,
        }
    }
}
