//! Transaction types and loading

use super::error::{ReportError, Result};
use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A transaction as it appears in an input file, with the date still unparsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: String,
    pub amount: Decimal,
    pub category: String,
}

/// A dated, categorized monetary movement. Negative amounts are expenses,
/// positive amounts are income.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: Decimal, category: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            category: category.into(),
        }
    }
}

impl TryFrom<&TransactionRecord> for Transaction {
    type Error = ReportError;

    fn try_from(record: &TransactionRecord) -> Result<Self> {
        Ok(Self {
            date: parse_date(&record.date)?,
            amount: record.amount,
            category: record.category.clone(),
        })
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ReportError::InvalidDateFormat {
            value: value.to_string(),
        }
    })
}

/// Converts records into transactions, failing on the first malformed date.
pub fn parse_transactions(records: &[TransactionRecord]) -> Result<Vec<Transaction>> {
    records.iter().map(Transaction::try_from).collect()
}

/// Reads a JSON array of transaction records from disk.
pub fn load_transactions<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<TransactionRecord>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transactions file: {}", path.display()))?;
    let records: Vec<TransactionRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse transactions file: {}", path.display()))?;
    debug!(count = records.len(), "Loaded transaction records");
    Ok(records)
}
