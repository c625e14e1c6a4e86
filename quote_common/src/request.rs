//! Payloads exchanged with the quote proxy.
//!
//! A single `FetchRequest` carries every symbol of one batch. The proxy answers
//! with a `FetchResponse` that either holds the quotes (`success: true`) or an
//! error message. Anything else is treated as a failed batch by the service.
use serde::{Deserialize, Serialize};

use crate::{Quote, QuoteError};

/// Request body sent to the proxy function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Symbols to look up in one call.
    pub symbols: Vec<String>,
}

impl FetchRequest {
    /// Creates a request for the given symbols.
    pub fn new(symbols: Vec<String>) -> Self {
        FetchRequest { symbols }
    }
}

/// Response body returned by the proxy function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Whether the upstream provider call succeeded.
    #[serde(default)]
    pub success: bool,
    /// Quotes for the requested symbols, present on success.
    #[serde(default)]
    pub data: Option<Vec<Quote>>,
    /// Provider-reported error message.
    #[serde(default)]
    pub error: Option<String>,
}

impl FetchResponse {
    /// Convert the envelope into the quote list, or the error it reports.
    pub fn into_quotes(self) -> Result<Vec<Quote>, QuoteError> {
        if !self.success {
            let message = self
                .error
                .unwrap_or_else(|| "proxy reported failure without a message".to_string());
            return Err(QuoteError::Provider(message));
        }
        self.data
            .ok_or_else(|| QuoteError::Format("successful response without data".to_string()))
    }
}
