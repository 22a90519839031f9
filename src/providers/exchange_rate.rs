use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::util::{RetryPolicy, http_client, with_retry};
use crate::core::cache::Cache;
use crate::core::currency::{CurrencyRateProvider, CurrencyRates};

/// Latest exchange rates from exchangerate-api.com (`/v4/latest/{base}`).
pub struct ExchangeRateApiProvider {
    base_url: String,
    cache: Cache<String, CurrencyRates>,
    retry: RetryPolicy,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, cache: Cache<String, CurrencyRates>, retry: RetryPolicy) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
            retry,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    rates: CurrencyRates,
}

#[async_trait]
impl CurrencyRateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self), fields(base = %base_currency))]
    async fn fetch_rates(&self, base_currency: &str) -> Result<CurrencyRates> {
        let key = base_currency.to_uppercase();
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let url = format!("{}/v4/latest/{}", self.base_url, key);
        debug!("Requesting currency rates from {}", url);

        let client = http_client(&self.retry)?;
        let response = with_retry(|| client.get(&url).send(), &self.retry)
            .await
            .map_err(|e| anyhow!("Request error: {} for base currency: {}", e, key))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                key
            ));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", key, e))?;

        debug!(count = data.rates.len(), "Received currency rates");
        if !data.rates.is_empty() {
            self.cache.put(key, data.rates.clone()).await;
        }
        Ok(data.rates)
    }
}
