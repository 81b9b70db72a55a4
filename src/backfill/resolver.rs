//! Backfill input validation and ledger merge

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use crate::ledger::{LedgerStore, Observation, Row, Source, StoreError};

/// A single rejected backfill field, with the value the operator sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = '{}': {}", self.field, self.value, self.reason)
    }
}

/// Backfill error types
#[derive(Error, Debug)]
pub enum BackfillInputError {
    /// One or more fields failed validation. Surfaced to the operator
    /// with every offending field; the ledger is left untouched.
    #[error("invalid backfill input: {}", format_fields(.0))]
    InvalidFields(Vec<FieldError>),

    /// Some but not all of the three metric values were supplied.
    #[error("partial backfill input: missing {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn format_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw operator-supplied correction values, still unvalidated strings.
///
/// All-`None` values is the default no-op path; `target_date` defaults
/// to one calendar day before the run's "today".
#[derive(Debug, Clone, Default)]
pub struct BackfillInput {
    pub target_date: Option<NaiveDate>,
    pub members: Option<String>,
    pub price: Option<String>,
    pub stock: Option<String>,
}

impl BackfillInput {
    /// True when no metric value was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.members.is_none() && self.price.is_none() && self.stock.is_none()
    }

    /// Validate into an observation for `default_date` (used when no
    /// explicit target date was given).
    ///
    /// Every offending field is collected so the operator sees the full
    /// list in one pass, not one failure per attempt.
    pub fn validate(&self, default_date: NaiveDate) -> Result<Observation, BackfillInputError> {
        let (members_raw, price_raw, stock_raw) = match (&self.members, &self.price, &self.stock) {
            (Some(m), Some(p), Some(s)) => (m, p, s),
            (m, p, s) => {
                let mut missing = Vec::new();
                if m.is_none() {
                    missing.push("members");
                }
                if p.is_none() {
                    missing.push("price");
                }
                if s.is_none() {
                    missing.push("stock");
                }
                return Err(BackfillInputError::Incomplete(missing));
            }
        };

        let mut errors = Vec::new();
        let members = parse_count("members", members_raw, &mut errors);
        let stock = parse_count("stock", stock_raw, &mut errors);
        let price = parse_price(price_raw, &mut errors);

        let date = self.target_date.unwrap_or(default_date);
        match (members, price, stock) {
            (Some(members), Some(price), Some(stock)) if errors.is_empty() => {
                Ok(Observation::new(date, members, price, stock))
            }
            _ => Err(BackfillInputError::InvalidFields(errors)),
        }
    }
}

fn parse_count(field: &'static str, value: &str, errors: &mut Vec<FieldError>) -> Option<u64> {
    match value.trim().parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => {
            errors.push(FieldError {
                field,
                value: value.to_string(),
                reason: "expected a non-negative integer".to_string(),
            });
            None
        }
    }
}

fn parse_price(value: &str, errors: &mut Vec<FieldError>) -> Option<Decimal> {
    match value.trim().parse::<Decimal>() {
        Ok(d) if !d.is_sign_negative() => Some(d),
        Ok(_) => {
            errors.push(FieldError {
                field: "price",
                value: value.to_string(),
                reason: "must not be negative".to_string(),
            });
            None
        }
        Err(_) => {
            errors.push(FieldError {
                field: "price",
                value: value.to_string(),
                reason: "expected a non-negative decimal".to_string(),
            });
            None
        }
    }
}

/// Merges an operator correction into the ledger before the main
/// computation.
pub struct BackfillResolver;

impl BackfillResolver {
    /// Apply `input` against the store for a run whose "today" is
    /// `today`. No-op when no values were supplied.
    ///
    /// On success the manual row is upserted and the ledger saved
    /// immediately, so the correction survives a later-stage failure.
    /// Returns the applied observation, if any.
    pub fn apply(
        store: &mut LedgerStore,
        input: &BackfillInput,
        today: NaiveDate,
    ) -> Result<Option<Observation>, BackfillInputError> {
        if input.is_empty() {
            return Ok(None);
        }

        let yesterday = today.pred_opt().expect("date arithmetic underflow");
        let obs = input.validate(yesterday)?;

        if obs.date == today {
            // The automated scrape targets today and runs later in the
            // pipeline, so it will overwrite this row. Operators should
            // backfill a prior day instead.
            warn!(
                date = %obs.date,
                "backfill targets the run's own date; a successful scrape will overwrite it"
            );
        }

        store.upsert(Row::from_observation(&obs, Source::Manual));
        store.save()?;
        info!(
            date = %obs.date,
            members = obs.members,
            price = %obs.price,
            stock = obs.stock,
            "applied manual backfill"
        );
        Ok(Some(obs))
    }
}
