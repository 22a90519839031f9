use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::util::{RetryPolicy, http_client, with_retry};
use crate::core::cache::Cache;
use crate::core::price::{StockSeries, StockSeriesProvider};

/// Intraday (5 minute) stock prices from Alpha Vantage.
pub struct AlphaVantageProvider {
    base_url: String,
    api_key: Option<String>,
    cache: Cache<String, StockSeries>,
    retry: RetryPolicy,
}

impl AlphaVantageProvider {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        cache: Cache<String, StockSeries>,
        retry: RetryPolicy,
    ) -> Self {
        AlphaVantageProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            cache,
            retry,
        }
    }
}

#[derive(Debug, Deserialize)]
struct IntradayResponse {
    #[serde(rename = "Time Series (5min)")]
    time_series: Option<StockSeries>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    // Rate limit notices come under either key
    #[serde(rename = "Information", alias = "Note")]
    information: Option<String>,
}

#[async_trait]
impl StockSeriesProvider for AlphaVantageProvider {
    #[instrument(name = "AlphaVantageFetch", skip(self), fields(symbol = %symbol))]
    async fn fetch_series(&self, symbol: &str) -> Result<StockSeries> {
        if let Some(cached) = self.cache.get(&symbol.to_string()).await {
            return Ok(cached);
        }

        if self.api_key.is_none() {
            warn!("No Alpha Vantage API key configured");
        }
        let url = format!("{}/query", self.base_url);
        let params = [
            ("function", "TIME_SERIES_INTRADAY"),
            ("symbol", symbol),
            ("interval", "5min"),
            ("apikey", self.api_key.as_deref().unwrap_or_default()),
        ];
        debug!(symbol, "Requesting intraday series");

        let client = http_client(&self.retry)?;
        let response = with_retry(|| client.get(&url).query(&params).send(), &self.retry)
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {}", e, symbol))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;
        let data: IntradayResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        if let Some(message) = data.error_message {
            return Err(anyhow!("Alpha Vantage error for {}: {}", symbol, message));
        }
        if let Some(notice) = &data.information {
            warn!(symbol, "Alpha Vantage notice: {notice}");
        }

        let series = data.time_series.unwrap_or_default();
        debug!(points = series.len(), "Received intraday series");
        if !series.is_empty() {
            self.cache.put(symbol.to_string(), series.clone()).await;
        }
        Ok(series)
    }
}
