//! Spending on one category over the trailing three months.
use super::aggregate::checked_sum;
use super::error::Result;
use super::transaction::Transaction;
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Display;

const TRAILING_MONTHS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpending {
    pub category: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total: Decimal,
}

impl Display for CategorySpending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total expenses for category '{}' from {} to {}: {}",
            self.category,
            self.start,
            self.end,
            self.total.normalize()
        )
    }
}

/// Sums `category` amounts dated from three months before `reference` up to
/// `reference`, both inclusive. The start day is clamped to the end of a
/// shorter month (May 31 goes back to Feb 28/29).
pub fn spending_by_category(
    transactions: &[Transaction],
    category: &str,
    reference: NaiveDate,
) -> Result<CategorySpending> {
    let start = reference
        .checked_sub_months(Months::new(TRAILING_MONTHS))
        .unwrap_or(NaiveDate::MIN);

    let total = transactions
        .iter()
        .filter(|tx| tx.category == category && start <= tx.date && tx.date <= reference)
        .try_fold(Decimal::ZERO, |acc, tx| checked_sum(acc, tx.amount, category))?;

    Ok(CategorySpending {
        category: category.to_string(),
        start,
        end: reference,
        total,
    })
}
