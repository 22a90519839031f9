//! Report computation and the abstractions it is built on

pub mod aggregate;
pub mod cache;
pub mod cashback;
pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod period;
pub mod price;
pub mod report;
pub mod spending;
pub mod transaction;

// Re-export main types for cleaner imports
pub use aggregate::{CategoryAmounts, CategorySummary, Sign, aggregate};
pub use currency::{CurrencyRateProvider, CurrencyRates};
pub use error::ReportError;
pub use period::{DateWindow, RangeKind};
pub use price::{StockSeries, StockSeriesProvider};
pub use report::{MarketData, ReportAssembler, ReportOptions, ReportPayload, build_report};
pub use transaction::{Transaction, TransactionRecord};
