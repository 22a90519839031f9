//! Currency exchange rate abstractions

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Exchange rates keyed by currency code, relative to one base currency.
pub type CurrencyRates = BTreeMap<String, f64>;

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Latest rates of every known currency against `base_currency`.
    async fn fetch_rates(&self, base_currency: &str) -> Result<CurrencyRates>;
}
