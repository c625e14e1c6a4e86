//! Trading-window check for the exchange.
//!
//! The status is a pure function of the UTC weekday and hour. The window is an
//! approximation of the NSE session (09:15–15:30 IST) in whole UTC hours; it
//! knows nothing about holidays.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Whether the market is currently trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    /// Inside the trading window.
    Open,
    /// Outside the trading window.
    Closed,
}

/// Trading window configuration, in UTC hours.
#[derive(Debug, Clone, Copy)]
pub struct TradingWindow {
    /// First open hour (inclusive).
    pub open_hour: u32,
    /// Close hour (exclusive).
    pub close_hour: u32,
    /// Monday to Friday only.
    pub weekdays_only: bool,
}

impl Default for TradingWindow {
    fn default() -> Self {
        Self {
            open_hour: 4,
            close_hour: 10,
            weekdays_only: true,
        }
    }
}

impl TradingWindow {
    /// Status of the window at instant `at`.
    pub fn status_at(&self, at: DateTime<Utc>) -> MarketStatus {
        if self.weekdays_only && matches!(at.weekday(), Weekday::Sat | Weekday::Sun) {
            return MarketStatus::Closed;
        }
        let hour = at.hour();
        if hour >= self.open_hour && hour < self.close_hour {
            MarketStatus::Open
        } else {
            MarketStatus::Closed
        }
    }
}

/// Market status at `at` using the default window.
pub fn market_status_at(at: DateTime<Utc>) -> MarketStatus {
    TradingWindow::default().status_at(at)
}

/// Market status right now.
pub fn market_status() -> MarketStatus {
    market_status_at(Utc::now())
}
