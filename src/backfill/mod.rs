//! Manual backfill for a prior day's row
//!
//! When the automated run was skipped or scraped wrong values, an
//! operator can supply corrected readings for a single past date. The
//! resolver validates the raw input, overwrites that date's row with
//! `source = manual`, and saves immediately so the correction survives
//! even if a later pipeline stage fails.

mod resolver;

pub use resolver::*;
