//! Service and provider configuration.
//!
//! Durations are stored as milliseconds so the structs can be read from a JSON
//! file; every field has a default, so a partial file (or `{}`) is valid.

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::debug;
use quote_common::net::{DEFAULT_HTTP_TIMEOUT_MS, QUOTE_FUNCTION, function_url};
use quote_common::{QuoteError, Result};
use serde::{Deserialize, Serialize};

/// Timing knobs of the quote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Freshness window of a cache entry.
    pub cache_ttl_ms: u64,
    /// How long symbols accumulate before one grouped fetch is issued.
    pub batch_delay_ms: u64,
    /// Upper bound on one provider call; expiry counts as a failed batch.
    pub fetch_timeout_ms: u64,
    /// Period of the per-symbol subscription poller.
    pub poll_interval_ms: u64,
    /// Extra slack a caller waits past batch delay and fetch timeout.
    pub wait_margin_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_ttl_ms: 60_000,
            batch_delay_ms: 500,
            fetch_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            poll_interval_ms: 30_000,
            wait_margin_ms: 1_000,
        }
    }
}

impl ServiceConfig {
    /// Read a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: ServiceConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        debug!("Loaded service config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Reject values that would make the service spin or never answer.
    pub fn validate(&self) -> Result<()> {
        if self.cache_ttl_ms == 0 {
            return Err(QuoteError::Config("cache_ttl_ms must be positive".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(QuoteError::Config("poll_interval_ms must be positive".into()));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(QuoteError::Config("fetch_timeout_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Longest a caller waits for its batch before reading the cache anyway.
    pub fn wait_deadline(&self) -> Duration {
        self.batch_delay()
            .saturating_add(self.fetch_timeout())
            .saturating_add(Duration::from_millis(self.wait_margin_ms))
    }
}

/// Where and how to reach the quote proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Full URL of the proxy function.
    pub endpoint: String,
    /// Key sent as `apikey` and bearer token, if the backend requires one.
    #[serde(default)]
    pub api_key: Option<String>,
    /// HTTP timeout of a single call.
    #[serde(default = "default_http_timeout")]
    pub timeout_ms: u64,
}

fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}

impl ProviderConfig {
    /// Config pointing at the quote function of a backend hosted at `base_url`.
    pub fn for_backend(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            endpoint: function_url(base_url, QUOTE_FUNCTION),
            api_key,
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
