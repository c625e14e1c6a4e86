//! Quote data model and JSON encoding helpers.
//!
//! A `Quote` is a point-in-time snapshot of one instrument: price, daily range,
//! volume and the exchange it trades on. Quotes come either from the remote
//! provider or from the fallback generator; the two are told apart only by
//! `is_fallback`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Market quote for a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol identifier, unique per exchange (e.g. `RELIANCE`).
    pub symbol: String,
    /// Company display name.
    #[serde(default, alias = "companyName")]
    pub company_name: String,
    /// Last traded price.
    #[serde(alias = "currentPrice")]
    pub current_price: f64,
    /// Move since previous close, in percent.
    #[serde(default, alias = "changePercent")]
    pub change_percent: f64,
    /// Move since previous close, absolute.
    #[serde(default)]
    pub change: f64,
    /// Intraday high.
    #[serde(default)]
    pub high: f64,
    /// Intraday low.
    #[serde(default)]
    pub low: f64,
    /// Previous session close.
    #[serde(default, alias = "previousClose")]
    pub previous_close: f64,
    /// Traded volume for the session.
    #[serde(default)]
    pub volume: u64,
    /// Exchange identifier (e.g. `NSE`).
    #[serde(default)]
    pub exchange: String,
    /// Update time reported by the source, RFC 3339.
    #[serde(default, alias = "lastUpdated")]
    pub last_updated: String,
    /// UTC milliseconds at which the quote was written into the cache.
    #[serde(default)]
    pub timestamp: u64,
    /// `true` when the quote was synthesized because the provider was unavailable.
    #[serde(default, alias = "isFallback")]
    pub is_fallback: bool,
}

impl Quote {
    /// Stamp the quote with the current cache-write time.
    pub fn stamped(mut self) -> Self {
        self.timestamp = now_millis();
        self
    }
}

/// Current UTC time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}
