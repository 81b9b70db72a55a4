//! Ledger layer for daily stats
//!
//! This module provides the durable date-keyed table of daily readings,
//! including load/parse, last-write-wins upsert, and atomic save.

mod row;
mod store;

pub use row::*;
pub use store::*;
