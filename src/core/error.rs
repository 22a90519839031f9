//! Error types for report computation

use thiserror::Error;

/// Errors raised by the pure report functions for malformed input.
///
/// Failures of the market data providers are not represented here; they are
/// degraded to empty mappings by the report assembler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("Invalid date format: '{value}' (expected YYYY-MM-DD)")]
    InvalidDateFormat { value: String },

    #[error("Unsupported range kind: '{value}' (use W, M, Y or ALL)")]
    UnsupportedRangeKind { value: String },

    #[error("Invalid month: {month} (expected 1-12)")]
    InvalidMonth { month: u32 },

    #[error("Amount overflow while summing category '{category}'")]
    AmountOverflow { category: String },
}

pub type Result<T> = std::result::Result<T, ReportError>;
