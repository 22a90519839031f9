//! Per-category cashback sums for a single calendar month.
use super::aggregate::{CategoryAccumulator, CategoryAmounts};
use super::error::{ReportError, Result};
use super::transaction::{TransactionRecord, parse_date};
use chrono::Datelike;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Sums amounts per category for the records dated in `year`/`month`.
///
/// Amounts are summed as stored, whatever their sign. Records with an
/// unparseable date are skipped. Categories appear in first-seen order.
pub fn analyze_cashback(
    records: &[TransactionRecord],
    year: i32,
    month: u32,
) -> Result<CategoryAmounts<Decimal>> {
    if !(1..=12).contains(&month) {
        return Err(ReportError::InvalidMonth { month });
    }

    let mut accumulator = CategoryAccumulator::default();
    for record in records {
        let date = match parse_date(&record.date) {
            Ok(date) => date,
            Err(e) => {
                warn!(category = %record.category, "Skipping cashback record: {e}");
                continue;
            }
        };
        if date.year() == year && date.month() == month {
            accumulator.add(&record.category, record.amount)?;
        }
    }

    let result = accumulator.into_amounts();
    debug!(year, month, categories = result.len(), "Cashback analysis done");
    Ok(result)
}
