//! Category-bucketed sums of transactions within a date window.
//!
//! Categories are ranked by accumulated magnitude, largest first. Equal
//! magnitudes keep the order in which their categories were first seen in the
//! input. Amounts stay exact [`Decimal`]s until the summary is emitted. The
//! total is rounded once from the exact sum and each listed category is rounded
//! once, half to even; `other` takes the difference, so
//! `total == other + sum(main)` always holds.
use super::error::{ReportError, Result};
use super::period::DateWindow;
use super::transaction::Transaction;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use tracing::debug;

/// Which side of the ledger to summarize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Strictly negative amounts, i.e. expenses.
    Negative,
    /// Strictly positive amounts, i.e. income.
    Positive,
}

impl Sign {
    pub fn matches(&self, amount: Decimal) -> bool {
        match self {
            Sign::Negative => amount < Decimal::ZERO,
            Sign::Positive => amount > Decimal::ZERO,
        }
    }
}

/// An ordered `category -> amount` mapping. Serializes as a JSON object whose
/// keys keep their insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAmounts<V> {
    entries: Vec<(String, V)>,
}

impl<V> CategoryAmounts<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn get(&self, category: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, amount)| amount)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries
            .iter()
            .map(|(name, amount)| (name.as_str(), amount))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl<V> Default for CategoryAmounts<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(String, V)> for CategoryAmounts<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for CategoryAmounts<i64> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, amount) in &self.entries {
            map.serialize_entry(category, amount)?;
        }
        map.end()
    }
}

impl Serialize for CategoryAmounts<Decimal> {
    // Emitted as JSON numbers rather than rust_decimal's default strings.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, amount) in &self.entries {
            let number = amount
                .normalize()
                .to_string()
                .parse::<serde_json::Number>()
                .map_err(S::Error::custom)?;
            map.serialize_entry(category, &number)?;
        }
        map.end()
    }
}

/// Accumulates amounts per category, keeping first-seen order.
#[derive(Debug, Default)]
pub(crate) struct CategoryAccumulator<'a> {
    index: HashMap<&'a str, usize>,
    sums: Vec<(&'a str, Decimal)>,
}

impl<'a> CategoryAccumulator<'a> {
    pub(crate) fn add(&mut self, category: &'a str, amount: Decimal) -> Result<()> {
        match self.index.get(category) {
            Some(&pos) => {
                let sum = &mut self.sums[pos].1;
                *sum = checked_sum(*sum, amount, category)?;
            }
            None => {
                self.index.insert(category, self.sums.len());
                self.sums.push((category, amount));
            }
        }
        Ok(())
    }

    pub(crate) fn into_amounts(self) -> CategoryAmounts<Decimal> {
        self.sums
            .into_iter()
            .map(|(category, amount)| (category.to_string(), amount))
            .collect()
    }

    // sort_by is stable: ties stay in first-seen order.
    fn into_ranked(mut self) -> Vec<(&'a str, Decimal)> {
        self.sums.sort_by(|a, b| b.1.cmp(&a.1));
        self.sums
    }
}

/// Ranked category totals for one side of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub total: i64,
    pub main: CategoryAmounts<i64>,
    /// Sum of the categories ranked below the cutoff. `None` when no cutoff
    /// was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<i64>,
}

/// Adds two amounts, failing instead of panicking past the `Decimal` range.
pub(crate) fn checked_sum(acc: Decimal, amount: Decimal, category: &str) -> Result<Decimal> {
    acc.checked_add(amount)
        .ok_or_else(|| ReportError::AmountOverflow {
            category: category.to_string(),
        })
}

/// Rounds half to even and saturates at the `i64` bounds.
pub fn round_amount(amount: Decimal) -> i64 {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Sums the magnitudes of the transactions matching `sign` inside `window`,
/// per category, and ranks the categories.
///
/// With `top_k = Some(k)` only the `k` largest categories are listed in
/// `main` and the rest are folded into `other`. With `None` every category is
/// listed and there is no `other`.
///
/// `other` absorbs the rounding residue of the listed categories. It is never
/// negative: when rounding the listed categories overshoots the exact total,
/// `total` is their rounded sum instead.
pub fn aggregate(
    transactions: &[Transaction],
    window: &DateWindow,
    sign: Sign,
    top_k: Option<usize>,
) -> Result<CategorySummary> {
    let mut accumulator = CategoryAccumulator::default();
    for tx in transactions
        .iter()
        .filter(|tx| sign.matches(tx.amount) && window.contains(tx.date))
    {
        accumulator.add(&tx.category, tx.amount.abs())?;
    }

    let ranked = accumulator.into_ranked();
    debug!(?sign, categories = ?ranked, "Accumulated category sums");

    let exact_total = ranked
        .iter()
        .try_fold(Decimal::ZERO, |acc, (category, amount)| {
            checked_sum(acc, *amount, category)
        })?;
    let mut total = round_amount(exact_total);

    let cutoff = top_k.unwrap_or(ranked.len()).min(ranked.len());
    let main: CategoryAmounts<i64> = ranked[..cutoff]
        .iter()
        .map(|(category, amount)| (category.to_string(), round_amount(*amount)))
        .collect();

    let mut other = None;
    if top_k.is_some() {
        let listed = main
            .iter()
            .fold(0i64, |acc, (_, amount)| acc.saturating_add(*amount));
        let residue = total.saturating_sub(listed).max(0);
        total = listed.saturating_add(residue);
        other = Some(residue);
    }

    Ok(CategorySummary { total, main, other })
}

/// Expense summary keeping the `top_k` largest categories.
pub fn summarize_expenses(
    transactions: &[Transaction],
    window: &DateWindow,
    top_k: usize,
) -> Result<CategorySummary> {
    aggregate(transactions, window, Sign::Negative, Some(top_k))
}

/// Income summary listing every category.
pub fn summarize_income(
    transactions: &[Transaction],
    window: &DateWindow,
) -> Result<CategorySummary> {
    aggregate(transactions, window, Sign::Positive, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::period::RangeKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(date: &str, amount: Decimal, category: &str) -> Transaction {
        Transaction::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            amount,
            category,
        )
    }

    fn october() -> Vec<Transaction> {
        vec![
            tx("2023-10-01", dec!(-200), "Food"),
            tx("2023-10-05", dec!(-150), "Transport"),
            tx("2023-10-10", dec!(300), "Salary"),
            tx("2023-10-15", dec!(-50), "Fun"),
            tx("2023-10-20", dec!(-100), "Food"),
            tx("2023-10-25", dec!(200), "Bonus"),
            tx("2023-10-30", dec!(-75), "Cash"),
        ]
    }

    fn pairs(amounts: &CategoryAmounts<i64>) -> Vec<(&str, i64)> {
        amounts.iter().map(|(c, a)| (c, *a)).collect()
    }

    #[test]
    fn test_month_expenses_with_cutoff() {
        let window = DateWindow::resolve("2023-10-15", RangeKind::Month).unwrap();
        let expenses = summarize_expenses(&october(), &window, 2).unwrap();

        assert_eq!(expenses.total, 575);
        assert_eq!(pairs(&expenses.main), vec![("Food", 300), ("Transport", 150)]);
        assert_eq!(expenses.other, Some(125));
    }

    #[test]
    fn test_month_income_keeps_all_categories() {
        let window = DateWindow::resolve("2023-10-15", RangeKind::Month).unwrap();
        let income = summarize_income(&october(), &window).unwrap();

        assert_eq!(income.total, 500);
        assert_eq!(pairs(&income.main), vec![("Salary", 300), ("Bonus", 200)]);
        assert_eq!(income.other, None);
    }

    #[test]
    fn test_week_window_only_counts_rows_inside() {
        let window = DateWindow::resolve("2023-10-15", RangeKind::Week).unwrap();
        assert_eq!(window.start, ymd(2023, 10, 9));
        assert_eq!(window.end, ymd(2023, 10, 15));

        let expenses = summarize_expenses(&october(), &window, 2).unwrap();
        assert_eq!(expenses.total, 50);
        assert_eq!(pairs(&expenses.main), vec![("Fun", 50)]);
        assert_eq!(expenses.other, Some(0));

        let income = summarize_income(&october(), &window).unwrap();
        assert_eq!(income.total, 300);
        assert_eq!(pairs(&income.main), vec![("Salary", 300)]);
    }

    #[test]
    fn test_empty_input() {
        let window = DateWindow::resolve("2023-10-15", RangeKind::Year).unwrap();
        let expenses = summarize_expenses(&[], &window, 7).unwrap();
        assert_eq!(
            expenses,
            CategorySummary {
                total: 0,
                main: CategoryAmounts::new(),
                other: Some(0),
            }
        );

        let income = summarize_income(&[], &window).unwrap();
        assert_eq!(income.total, 0);
        assert!(income.main.is_empty());
    }

    #[test]
    fn test_boundary_dates() {
        let window = DateWindow {
            start: ymd(2023, 10, 9),
            end: ymd(2023, 10, 15),
        };
        let transactions = vec![
            tx("2023-10-08", dec!(-1), "Before"),
            tx("2023-10-09", dec!(-2), "Start"),
            tx("2023-10-15", dec!(-4), "End"),
            tx("2023-10-16", dec!(-8), "After"),
        ];

        let expenses = summarize_expenses(&transactions, &window, 10).unwrap();
        assert_eq!(expenses.total, 6);
        assert_eq!(pairs(&expenses.main), vec![("End", 4), ("Start", 2)]);
        assert!(expenses.main.get("Before").is_none());
        assert!(expenses.main.get("After").is_none());
    }

    #[test]
    fn test_filtered_out_categories_do_not_appear() {
        let window = DateWindow::resolve("2023-10-15", RangeKind::Month).unwrap();
        let transactions = vec![
            tx("2023-10-02", dec!(-10), "Food"),
            tx("2023-10-03", dec!(40), "Refund"),
            tx("2023-09-30", dec!(-99), "September"),
            tx("2023-10-04", dec!(0), "Zero"),
        ];

        let expenses = summarize_expenses(&transactions, &window, 5).unwrap();
        assert_eq!(expenses.main.categories().collect::<Vec<_>>(), vec!["Food"]);

        let income = summarize_income(&transactions, &window).unwrap();
        assert_eq!(income.main.categories().collect::<Vec<_>>(), vec!["Refund"]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let window = DateWindow::resolve("2023-10-15", RangeKind::Month).unwrap();
        let transactions = vec![
            tx("2023-10-01", dec!(-50), "Books"),
            tx("2023-10-02", dec!(-80), "Rent"),
            tx("2023-10-03", dec!(-50), "Apps"),
            tx("2023-10-04", dec!(-50), "Cafe"),
        ];

        let expenses = summarize_expenses(&transactions, &window, 3).unwrap();
        assert_eq!(
            pairs(&expenses.main),
            vec![("Rent", 80), ("Books", 50), ("Apps", 50)]
        );
        assert_eq!(expenses.other, Some(50));
    }

    #[test]
    fn test_total_equals_main_plus_other_after_rounding() {
        let window = DateWindow::resolve("2023-10-15", RangeKind::Month).unwrap();
        let transactions = vec![
            tx("2023-10-01", dec!(-10.5), "A"),
            tx("2023-10-02", dec!(-11.5), "B"),
            tx("2023-10-03", dec!(-0.4), "C"),
            tx("2023-10-04", dec!(-0.4), "D"),
            tx("2023-10-05", dec!(-2.5), "E"),
        ];

        let expenses = summarize_expenses(&transactions, &window, 2).unwrap();
        // Half to even: 11.5 -> 12, 10.5 -> 10; the exact total 25.3 -> 25.
        assert_eq!(pairs(&expenses.main), vec![("B", 12), ("A", 10)]);
        assert_eq!(expenses.total, 25);
        assert_eq!(expenses.other, Some(3));
        let main_sum: i64 = expenses.main.iter().map(|(_, a)| *a).sum();
        assert_eq!(expenses.total, main_sum + expenses.other.unwrap());
    }

    #[test]
    fn test_small_categories_still_count_towards_total() {
        let window = DateWindow::resolve("2023-10-15", RangeKind::Month).unwrap();
        let transactions: Vec<Transaction> = (0..100)
            .flat_map(|i| {
                let category = format!("Category {i}");
                [
                    tx("2023-10-10", dec!(-0.4), &category),
                    tx("2023-10-11", dec!(0.4), &category),
                ]
            })
            .collect();

        let expenses = summarize_expenses(&transactions, &window, 2).unwrap();
        assert_eq!(expenses.total, 40);
        assert_eq!(expenses.main.len(), 2);
        assert!(expenses.main.iter().all(|(_, amount)| *amount == 0));
        assert_eq!(expenses.other, Some(40));

        let income = summarize_income(&transactions, &window).unwrap();
        assert_eq!(income.total, 40);
        assert_eq!(income.main.len(), 100);
    }

    #[test]
    fn test_other_is_never_negative() {
        let window = DateWindow::resolve("2023-10-15", RangeKind::Month).unwrap();
        let transactions = vec![
            tx("2023-10-01", dec!(-1.5), "A"),
            tx("2023-10-02", dec!(-1.5), "B"),
        ];

        // Each category rounds up to 2 while the exact total 3 stays 3.
        let expenses = summarize_expenses(&transactions, &window, 2).unwrap();
        assert_eq!(pairs(&expenses.main), vec![("A", 2), ("B", 2)]);
        assert_eq!(expenses.other, Some(0));
        assert_eq!(expenses.total, 4);
    }

    #[test]
    fn test_overflowing_category_is_an_error() {
        let window = DateWindow::resolve("2023-10-15", RangeKind::Month).unwrap();
        let transactions = vec![
            tx("2023-10-01", -Decimal::MAX, "Food"),
            tx("2023-10-02", -Decimal::MAX, "Food"),
        ];

        let err = summarize_expenses(&transactions, &window, 2).unwrap_err();
        assert_eq!(
            err,
            ReportError::AmountOverflow {
                category: "Food".to_string()
            }
        );
    }

    #[test]
    fn test_overflowing_total_is_an_error() {
        let window = DateWindow::resolve("2023-10-15", RangeKind::Month).unwrap();
        let transactions = vec![
            tx("2023-10-01", Decimal::MAX, "Salary"),
            tx("2023-10-02", Decimal::MAX, "Bonus"),
        ];

        let err = summarize_income(&transactions, &window).unwrap_err();
        assert!(matches!(err, ReportError::AmountOverflow { .. }));
    }

    #[test]
    fn test_cutoff_larger_than_category_count() {
        let window = DateWindow::resolve("2023-10-15", RangeKind::Month).unwrap();
        let expenses = summarize_expenses(&october(), &window, 7).unwrap();
        assert_eq!(expenses.main.len(), 4);
        assert_eq!(expenses.other, Some(0));
        assert_eq!(expenses.total, 575);
    }

    #[test]
    fn test_zero_cutoff_folds_everything_into_other() {
        let window = DateWindow::resolve("2023-10-15", RangeKind::Month).unwrap();
        let expenses = summarize_expenses(&october(), &window, 0).unwrap();
        assert!(expenses.main.is_empty());
        assert_eq!(expenses.other, Some(575));
        assert_eq!(expenses.total, 575);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let window = DateWindow::resolve("2023-10-15", RangeKind::All).unwrap();
        let transactions = october();
        let first = aggregate(&transactions, &window, Sign::Negative, Some(2)).unwrap();
        let second = aggregate(&transactions, &window, Sign::Negative, Some(2)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_serialization_preserves_rank_order() {
        let window = DateWindow::resolve("2023-10-15", RangeKind::Month).unwrap();
        let transactions = vec![
            tx("2023-10-01", dec!(-5), "Яблоки"),
            tx("2023-10-02", dec!(-20), "Транспорт"),
            tx("2023-10-03", dec!(-1), "Arcade"),
        ];

        let expenses = summarize_expenses(&transactions, &window, 2).unwrap();
        let json = serde_json::to_string(&expenses).unwrap();
        assert_eq!(
            json,
            r#"{"total":26,"main":{"Транспорт":20,"Яблоки":5},"other":1}"#
        );

        let income = summarize_income(&transactions, &window).unwrap();
        assert_eq!(
            serde_json::to_string(&income).unwrap(),
            r#"{"total":0,"main":{}}"#
        );
    }

    #[test]
    fn test_round_amount() {
        assert_eq!(round_amount(dec!(0.5)), 0);
        assert_eq!(round_amount(dec!(1.5)), 2);
        assert_eq!(round_amount(dec!(2.5)), 2);
        assert_eq!(round_amount(dec!(2.51)), 3);
        assert_eq!(round_amount(dec!(-3.5)), -4);
    }
}
