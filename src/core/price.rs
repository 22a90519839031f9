//! Stock price series abstractions

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Intraday price points keyed by timestamp. The fields of each point are
/// passed through as the upstream service reports them.
pub type StockSeries = BTreeMap<String, serde_json::Value>;

#[async_trait]
pub trait StockSeriesProvider: Send + Sync {
    async fn fetch_series(&self, symbol: &str) -> Result<StockSeries>;
}
