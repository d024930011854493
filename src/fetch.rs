//! Async client for the rates endpoint.
//!
//! Wraps reqwest with bounded retries, exponential backoff between failed
//! attempts, and a politeness delay after every successful fetch. A failed
//! budget always surfaces as [`FetchError::Exhausted`], never partial data.

use crate::params::Combination;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Default rates endpoint.
pub const DEFAULT_BASE_URL: &str = "https://overwatch.blizzard.com/en-us/rates/data/";

/// Default attempt budget per combination.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Per-request network timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Unit for the exponential backoff schedule (1, 2, 4 … units).
const BACKOFF_UNIT: Duration = Duration::from_secs(1);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Failure modes of a fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure, including timeouts and JSON decode errors.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The endpoint answered with a non-success status.
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    /// The attempt budget is spent; the combination must be skipped.
    #[error("gave up on {url} after {attempts} attempts")]
    Exhausted { url: String, attempts: u32 },
    /// The configured base URL does not parse.
    #[error("invalid base URL: {0}")]
    BadBaseUrl(#[from] url::ParseError),
}

/// HTTP client for the rates endpoint, shared for the process lifetime.
#[derive(Debug, Clone)]
pub struct RatesClient {
    client: reqwest::Client,
    base_url: Url,
    /// Fixed wait after each successful fetch, independent of retry backoff.
    delay: Duration,
    max_attempts: u32,
    backoff_unit: Duration,
}

impl RatesClient {
    /// Create a client for the given endpoint with a politeness delay.
    pub fn new(base_url: &str, delay: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            delay,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_unit: BACKOFF_UNIT,
        })
    }

    /// Override the attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Override the unit of the backoff schedule.
    pub fn with_backoff_unit(mut self, backoff_unit: Duration) -> Self {
        self.backoff_unit = backoff_unit;
        self
    }

    /// Build the request URL with parameters in fixed order:
    /// input, map, region, role, rq, tier.
    pub fn build_url(&self, combination: &Combination) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("input", combination.input.as_str())
            .append_pair("map", &combination.map)
            .append_pair("region", combination.region.as_str())
            .append_pair("role", combination.role.as_str())
            .append_pair("rq", &combination.rq.to_string())
            .append_pair("tier", combination.tier.as_str());
        url
    }

    /// Fetch the payload for one combination.
    ///
    /// Performs up to the configured number of attempts, sleeping
    /// `backoff_unit * 2^attempt` after each failed attempt except the last.
    /// The politeness delay runs after a successful fetch, before returning.
    pub async fn fetch(&self, combination: &Combination) -> Result<Value, FetchError> {
        let url = self.build_url(combination);

        for attempt in 0..self.max_attempts {
            match self.attempt(&url).await {
                Ok(payload) => {
                    tokio::time::sleep(self.delay).await;
                    return Ok(payload);
                }
                Err(e) => {
                    warn!(
                        "attempt {}/{} for {url} failed: {e}",
                        attempt + 1,
                        self.max_attempts
                    );
                    if attempt + 1 < self.max_attempts {
                        tokio::time::sleep(self.backoff_unit * 2u32.pow(attempt)).await;
                    }
                }
            }
        }

        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts: self.max_attempts,
        })
    }

    async fn attempt(&self, url: &Url) -> Result<Value, FetchError> {
        debug!("fetching {url}");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}
