//! Reporting windows derived from a reference date

use super::error::{ReportError, Result};
use super::transaction::parse_date;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeKind {
    Week,
    Month,
    Year,
    All,
}

impl Display for RangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RangeKind::Week => "W",
                RangeKind::Month => "M",
                RangeKind::Year => "Y",
                RangeKind::All => "ALL",
            }
        )
    }
}

impl FromStr for RangeKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "W" => Ok(RangeKind::Week),
            "M" => Ok(RangeKind::Month),
            "Y" => Ok(RangeKind::Year),
            "ALL" => Ok(RangeKind::All),
            _ => Err(ReportError::UnsupportedRangeKind {
                value: s.to_string(),
            }),
        }
    }
}

/// An inclusive `[start, end]` date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Parses `reference` as `YYYY-MM-DD` and derives the window for `kind`.
    pub fn resolve(reference: &str, kind: RangeKind) -> Result<Self> {
        let date = parse_date(reference)?;
        let window = Self::for_date(date, kind);
        debug!(start = %window.start, end = %window.end, %kind, "Resolved date window");
        Ok(window)
    }

    pub fn for_date(date: NaiveDate, kind: RangeKind) -> Self {
        match kind {
            RangeKind::Week => {
                let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
                Self {
                    start,
                    end: start + Duration::days(6),
                }
            }
            RangeKind::Month => Self {
                start: first_of_month(date.year(), date.month()),
                end: last_of_month(date.year(), date.month()),
            },
            RangeKind::Year => Self {
                start: first_of_month(date.year(), 1),
                end: last_of_month(date.year(), 12),
            },
            RangeKind::All => Self {
                start: NaiveDate::MIN,
                end: date,
            },
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn last_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
