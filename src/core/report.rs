//! Combines the expense and income summaries of one window with market data.
use super::aggregate::{CategorySummary, summarize_expenses, summarize_income};
use super::currency::{CurrencyRateProvider, CurrencyRates};
use super::error::Result;
use super::period::{DateWindow, RangeKind};
use super::price::{StockSeries, StockSeriesProvider};
use super::transaction::Transaction;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{info, warn};

/// Externally fetched data merged into a report as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketData {
    pub currency_rates: CurrencyRates,
    pub stock_prices: StockSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPayload {
    pub expenses: CategorySummary,
    pub income: CategorySummary,
    pub currency_rates: CurrencyRates,
    pub stock_prices: StockSeries,
}

impl ReportPayload {
    /// Pretty JSON with four-space indentation. Non-ASCII text is kept as is.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)?;
        // serde_json only ever writes valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Builds the report for the window derived from `reference` and `kind`.
///
/// Fails when the reference date cannot be parsed; no partial report is
/// produced in that case.
pub fn build_report(
    transactions: &[Transaction],
    reference: &str,
    kind: RangeKind,
    top_k: usize,
    market: MarketData,
) -> Result<ReportPayload> {
    let window = DateWindow::resolve(reference, kind)?;
    build_report_for_window(transactions, &window, top_k, market)
}

pub fn build_report_for_window(
    transactions: &[Transaction],
    window: &DateWindow,
    top_k: usize,
    market: MarketData,
) -> Result<ReportPayload> {
    Ok(ReportPayload {
        expenses: summarize_expenses(transactions, window, top_k)?,
        income: summarize_income(transactions, window)?,
        currency_rates: market.currency_rates,
        stock_prices: market.stock_prices,
    })
}

/// Settings for one report run.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Number of expense categories listed individually.
    pub top_k: usize,
    pub base_currency: String,
    pub stock_symbol: String,
}

/// Fetches market data from the configured providers and assembles reports.
pub struct ReportAssembler<'a> {
    currency_provider: &'a (dyn CurrencyRateProvider + Send + Sync),
    stock_provider: &'a (dyn StockSeriesProvider + Send + Sync),
}

impl<'a> ReportAssembler<'a> {
    pub fn new(
        currency_provider: &'a (dyn CurrencyRateProvider + Send + Sync),
        stock_provider: &'a (dyn StockSeriesProvider + Send + Sync),
    ) -> Self {
        Self {
            currency_provider,
            stock_provider,
        }
    }

    /// Fetches rates and the stock series concurrently. A failing provider
    /// yields an empty mapping for its field.
    pub async fn fetch_market_data(&self, base_currency: &str, symbol: &str) -> MarketData {
        let (rates, series) = futures::join!(
            self.currency_provider.fetch_rates(base_currency),
            self.stock_provider.fetch_series(symbol)
        );

        let currency_rates = rates.unwrap_or_else(|e| {
            warn!(base_currency, "Currency rates unavailable: {e}");
            CurrencyRates::new()
        });
        let stock_prices = series.unwrap_or_else(|e| {
            warn!(symbol, "Stock prices unavailable: {e}");
            StockSeries::new()
        });

        MarketData {
            currency_rates,
            stock_prices,
        }
    }

    /// Resolves the window before any network access, so a malformed
    /// reference date fails without fetching anything.
    pub async fn assemble(
        &self,
        transactions: &[Transaction],
        reference: &str,
        kind: RangeKind,
        options: &ReportOptions,
    ) -> Result<ReportPayload> {
        let window = DateWindow::resolve(reference, kind)?;
        info!(start = %window.start, end = %window.end, "Building report");

        let market = self
            .fetch_market_data(&options.base_currency, &options.stock_symbol)
            .await;
        build_report_for_window(transactions, &window, options.top_k, market)
    }
}
