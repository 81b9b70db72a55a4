//! Mock stats provider for testing
//!
//! Returns a fixed observation, or fails on demand to exercise the
//! scrape-failure path.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::ledger::Observation;

use super::traits::{ProviderError, ProviderResult, StatsProvider};

/// Mock provider returning canned readings.
pub struct MockProvider {
    pub members: u64,
    pub price: Decimal,
    pub stock: u64,
    /// When set, every fetch fails with `ValueNotFound` for this field.
    pub fail_field: Option<&'static str>,
}

impl MockProvider {
    /// Provider that always yields the given readings.
    pub fn with_readings(members: u64, price: Decimal, stock: u64) -> Self {
        Self {
            members,
            price,
            stock,
            fail_field: None,
        }
    }

    /// Provider that always fails, simulating an unreadable page.
    pub fn failing() -> Self {
        Self {
            members: 0,
            price: Decimal::ZERO,
            stock: 0,
            fail_field: Some("members"),
        }
    }
}

#[async_trait]
impl StatsProvider for MockProvider {
    async fn fetch_today(&self, date: NaiveDate) -> ProviderResult<Observation> {
        if let Some(field) = self.fail_field {
            return Err(ProviderError::ValueNotFound { field });
        }
        Ok(Observation::new(date, self.members, self.price, self.stock))
    }
}
