//! Remote quote sources.
//!
//! `QuoteProvider` is the seam between the service and whatever answers a
//! batch of symbols. Two implementations ship with the crate:
//!
//! - `HttpQuoteProvider` — POSTs `{"symbols": [...]}` to the backend proxy function and
//!   decodes the `{"success", "data", "error"}` envelope.
//! - `OfflineQuoteProvider` — always fails, so every lookup is served from fallback data.
//!
//! Any error a provider returns fails the whole batch; the service never sees
//! partial results from a failed call.

use log::debug;
use quote_common::request::{FetchRequest, FetchResponse};
use quote_common::{Quote, QuoteError, Result};
use reqwest::blocking::Client;

use crate::config::ProviderConfig;

/// Source of quotes for a batch of symbols.
pub trait QuoteProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch quotes for all `symbols` in one call.
    fn fetch_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>>;
}

/// Provider backed by the HTTP quote proxy.
pub struct HttpQuoteProvider {
    client: Client,
    config: ProviderConfig,
}

impl HttpQuoteProvider {
    /// Build a provider with its own HTTP client.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| QuoteError::Http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

impl QuoteProvider for HttpQuoteProvider {
    fn name(&self) -> &str {
        "http-proxy"
    }

    fn fetch_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>> {
        let body = FetchRequest::new(symbols.to_vec());
        debug!("POST {} for {:?}", self.endpoint(), symbols);

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request
            .send()
            .map_err(|e| QuoteError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Http(format!("proxy returned {}", status)));
        }

        let text = response
            .text()
            .map_err(|e| QuoteError::Http(format!("Failed to read proxy response: {}", e)))?;
        let envelope: FetchResponse = serde_json::from_str(&text)?;
        envelope.into_quotes()
    }
}

/// Provider used when no proxy is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineQuoteProvider;

impl QuoteProvider for OfflineQuoteProvider {
    fn name(&self) -> &str {
        "offline"
    }

    fn fetch_quotes(&self, _symbols: &[String]) -> Result<Vec<Quote>> {
        Err(QuoteError::Provider(
            "offline mode: no quote provider configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_provider_always_fails() {
        let provider = OfflineQuoteProvider;
        assert_eq!(provider.name(), "offline");
        assert!(matches!(
            provider.fetch_quotes(&["TCS".to_string()]),
            Err(QuoteError::Provider(_))
        ));
    }

    #[test]
    fn http_provider_keeps_endpoint() {
        let provider =
            HttpQuoteProvider::new(ProviderConfig::for_backend("http://127.0.0.1:9", None))
                .unwrap();
        assert_eq!(provider.endpoint(), "http://127.0.0.1:9/functions/v1/stock-quotes");
    }
}
