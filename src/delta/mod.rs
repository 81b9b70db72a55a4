//! Day-over-day delta computation
//!
//! Selects the baseline row (the day immediately preceding the reported
//! date) and computes signed deltas for each metric. When no baseline
//! exists the deltas are marked unavailable rather than zero-filled, so
//! "no prior data" is never mistaken for "no change".

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::ledger::{LedgerStore, Observation, PRICE_SCALE};

/// Signed day-over-day changes, each `None` when no baseline row exists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetricDeltas {
    pub members: Option<i64>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
}

impl MetricDeltas {
    pub fn is_available(&self) -> bool {
        self.members.is_some()
    }
}

/// Today's raw values bundled with their deltas, ready for reporting.
///
/// Purely a reporting artifact; producing one never mutates the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySnapshot {
    pub observation: Observation,
    /// Date of the row the deltas were computed against, if one existed.
    pub baseline_date: Option<NaiveDate>,
    pub deltas: MetricDeltas,
}

/// Computes the previous-day baseline and signed deltas.
pub struct DeltaEngine;

impl DeltaEngine {
    /// Compute deltas for `today`'s observation against the ledger.
    ///
    /// Baseline = the row for exactly `observation.date - 1 day`. A gap
    /// day (or first run) yields unavailable deltas. Negative deltas are
    /// valid readings, not errors.
    pub fn compute(store: &LedgerStore, observation: &Observation) -> DailySnapshot {
        let baseline_date = observation
            .date
            .pred_opt()
            .expect("date arithmetic underflow");

        let deltas = match store.find(baseline_date) {
            Some(baseline) => MetricDeltas {
                members: Some(observation.members as i64 - baseline.members as i64),
                price: Some((observation.price - baseline.price).round_dp(PRICE_SCALE)),
                stock: Some(observation.stock as i64 - baseline.stock as i64),
            },
            None => MetricDeltas::default(),
        };

        DailySnapshot {
            observation: observation.clone(),
            baseline_date: deltas.is_available().then_some(baseline_date),
            deltas,
        }
    }
}
