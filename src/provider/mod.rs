//! Stats provider abstractions and implementations
//!
//! This module defines the pluggable scrape interface and implements the
//! FiNANCiE page provider plus a mock for testing.

pub mod financie;
pub mod mock;
mod traits;

pub use financie::FinancieProvider;
pub use mock::MockProvider;
pub use traits::*;
