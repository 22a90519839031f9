use crate::core::config::ProvidersConfig;
use anyhow::Error;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How often and how patiently a provider retries failed requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of retry attempts (total runs = 1 initial + retries)
    pub retries: usize,
    pub delay: Duration,
    /// Per-request timeout handed to the HTTP client
    pub timeout: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            retries: 0,
            delay: Duration::ZERO,
            timeout: Duration::from_secs(10),
        }
    }
}

impl From<&ProvidersConfig> for RetryPolicy {
    fn from(config: &ProvidersConfig) -> Self {
        Self {
            retries: config.retries,
            delay: Duration::from_millis(config.retry_delay_ms),
            timeout: config.timeout(),
        }
    }
}

/// Builds the HTTP client shared by the market data providers.
pub fn http_client(policy: &RetryPolicy) -> Result<reqwest::Client, Error> {
    Ok(reqwest::Client::builder()
        .user_agent("finreport/0.1")
        .timeout(policy.timeout)
        .build()?)
}

/// Retries an async request according to `policy`
///
/// Only transport errors are retried. The caller inspects the status of the
/// response it eventually gets.
pub async fn with_retry<F, Fut, T>(mut operation: F, policy: &RetryPolicy) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        match operation().await.map_err(anyhow::Error::from) {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt > policy.retries {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt, policy.retries, err
                );
                attempt += 1;
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
