//! CSV-backed ledger store
//!
//! Owns the durable table of daily rows. The on-disk format is a flat
//! CSV with a header row and one row per date:
//!
//! ```text
//! date,members,price,stock
//! 2025-11-18,22000,11.0000,50000
//! ```
//!
//! Saves are atomic: the full sequence is written to a sibling temp file
//! which is then renamed over the target, so a crash mid-save leaves the
//! previously persisted rows intact.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use super::row::{Row, Source, PRICE_SCALE};

const HEADER: [&str; 4] = ["date", "members", "price", "stock"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Ledger store error types
#[derive(Error, Debug)]
pub enum StoreError {
    /// A persisted row cannot be trusted. Fatal: the delta computation
    /// depends on trustworthy history, so the run aborts before any write.
    #[error("corrupt ledger at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable date-keyed table of daily rows.
///
/// Invariants: rows are kept sorted by date ascending with at most one
/// row per date. A write for an existing date replaces the prior row
/// entirely; rows are never deleted by normal operation.
#[derive(Debug)]
pub struct LedgerStore {
    path: PathBuf,
    rows: Vec<Row>,
}

impl LedgerStore {
    /// Load the ledger from `path`.
    ///
    /// A missing file is an empty ledger (first run), not an error.
    /// Unparseable rows and duplicate dates fail with
    /// [`StoreError::Corrupt`].
    pub fn load(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if !path.exists() {
            debug!(path = %path.display(), "ledger file absent, starting empty");
            return Ok(Self { path, rows: Vec::new() });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&path)?;

        // Older files may predate the price/stock columns; map by header
        // name and default the missing columns to zero.
        let headers = reader.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h == name);
        let date_col = column("date").ok_or_else(|| StoreError::Corrupt {
            line: 1,
            reason: "missing 'date' column".to_string(),
        })?;
        let members_col = column("members").ok_or_else(|| StoreError::Corrupt {
            line: 1,
            reason: "missing 'members' column".to_string(),
        })?;
        let price_col = column("price");
        let stock_col = column("stock");

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let line = i + 2; // 1-based, after the header
            let record = record?;

            let date = NaiveDate::parse_from_str(field(&record, date_col, "date", line)?, DATE_FORMAT)
                .map_err(|e| StoreError::Corrupt {
                    line,
                    reason: format!("unparseable date: {}", e),
                })?;
            let members = parse_count(field(&record, members_col, "members", line)?, "members", line)?;
            let price = match price_col {
                Some(col) => parse_price(field(&record, col, "price", line)?, line)?,
                None => Decimal::ZERO,
            };
            let stock = match stock_col {
                Some(col) => parse_count(field(&record, col, "stock", line)?, "stock", line)?,
                None => 0,
            };

            rows.push(Row::new(date, members, price, stock, Source::Automated));
        }

        rows.sort_by_key(|r| r.date);
        if let Some(pair) = rows.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(StoreError::Corrupt {
                line: 0,
                reason: format!("duplicate rows for date {}", pair[0].date),
            });
        }

        debug!(path = %path.display(), rows = rows.len(), "loaded ledger");
        Ok(Self { path, rows })
    }

    /// Insert the row, or wholly replace the existing row for the same
    /// date. Keeps ascending date order. Duplicate dates are defined
    /// behavior (last-write-wins), never an error.
    pub fn upsert(&mut self, row: Row) {
        match self.rows.binary_search_by_key(&row.date, |r| r.date) {
            Ok(idx) => self.rows[idx] = row,
            Err(idx) => self.rows.insert(idx, row),
        }
    }

    /// Row for the exact date, if any. Absence is a normal condition
    /// (first run, or a gap day).
    pub fn find(&self, date: NaiveDate) -> Option<&Row> {
        self.rows
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|idx| &self.rows[idx])
    }

    /// All rows, sorted by date ascending.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Path of the durable file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full ordered sequence back to durable storage.
    ///
    /// All rows or none: the sequence goes to a sibling temp file first
    /// and is renamed over the target, so previously persisted rows
    /// survive a crash mid-save.
    pub fn save(&self) -> StoreResult<()> {
        let tmp_path = self.path.with_extension("csv.tmp");

        {
            let mut writer = csv::Writer::from_path(&tmp_path)?;
            writer.write_record(HEADER)?;
            for row in &self.rows {
                writer.write_record([
                    row.date.format(DATE_FORMAT).to_string(),
                    row.members.to_string(),
                    format!("{:.prec$}", row.price, prec = PRICE_SCALE as usize),
                    row.stock.to_string(),
                ])?;
            }
            writer.flush().map_err(|e| StoreError::Io {
                path: tmp_path.clone(),
                source: e,
            })?;
        }

        fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        debug!(path = %self.path.display(), rows = self.rows.len(), "saved ledger");
        Ok(())
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    col: usize,
    name: &str,
    line: usize,
) -> StoreResult<&'r str> {
    record.get(col).ok_or_else(|| StoreError::Corrupt {
        line,
        reason: format!("missing field '{}'", name),
    })
}

fn parse_count(value: &str, name: &str, line: usize) -> StoreResult<u64> {
    value.trim().parse::<u64>().map_err(|_| StoreError::Corrupt {
        line,
        reason: format!("non-numeric {}: '{}'", name, value),
    })
}

fn parse_price(value: &str, line: usize) -> StoreResult<Decimal> {
    let price: Decimal = value.trim().parse().map_err(|_| StoreError::Corrupt {
        line,
        reason: format!("non-numeric price: '{}'", value),
    })?;
    if price.is_sign_negative() {
        return Err(StoreError::Corrupt {
            line,
            reason: format!("negative price: '{}'", value),
        });
    }
    Ok(price)
}
