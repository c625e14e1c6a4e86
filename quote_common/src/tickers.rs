//! Known symbols and helpers shared by the service and the client.
//!
//! `Ticker` lists the NSE instruments the platform knows by name. Knowing a
//! symbol only matters for display names and for the deterministic base price
//! used by the fallback generator; any other well-formed symbol is still
//! accepted as a plain string.

use std::io::BufRead;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::QuoteError;

/// Base price used for symbols outside the catalog.
pub const DEFAULT_BASE_PRICE: f64 = 1000.0;

/// Curated list shown as "trending" by the UI.
pub const TRENDING: [Ticker; 10] = [
    Ticker::RELIANCE,
    Ticker::TCS,
    Ticker::HDFCBANK,
    Ticker::INFY,
    Ticker::ICICIBANK,
    Ticker::HINDUNILVR,
    Ticker::ITC,
    Ticker::SBIN,
    Ticker::BHARTIARTL,
    Ticker::KOTAKBANK,
];

/// Trait providing watchlist parsing.
pub trait TickerParser {
    /// Parses symbols from a buffered reader.
    ///
    /// Symbols may be separated by commas, spaces or new lines. They are
    /// upper-cased and de-duplicated, keeping first-seen order. Returns an
    /// error if any token is not a well-formed symbol.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<String>, QuoteError>;
}

impl TickerParser for Ticker {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<String>, QuoteError> {
        let mut symbols: Vec<String> = Vec::new();

        for line_result in reader.lines() {
            let line = line_result.map_err(QuoteError::Io)?;
            for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
                if token.is_empty() {
                    continue;
                }
                if !is_well_formed(token) {
                    return Err(QuoteError::ParseWatchlist(format!(
                        "invalid symbol {:?}",
                        token
                    )));
                }
                let symbol = token.to_ascii_uppercase();
                if !symbols.contains(&symbol) {
                    symbols.push(symbol);
                }
            }
        }
        Ok(symbols)
    }
}

/// Set of symbols with a known display name and fallback base price.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Hash,
    Eq,
    PartialEq,
)]
#[strum(ascii_case_insensitive)]
pub enum Ticker {
    RELIANCE,
    TCS,
    HDFCBANK,
    INFY,
    ICICIBANK,
    HINDUNILVR,
    ITC,
    SBIN,
    BHARTIARTL,
    KOTAKBANK,
    LT,
    AXISBANK,
    ASIANPAINT,
    MARUTI,
    WIPRO,
    HCLTECH,
    BAJFINANCE,
    SUNPHARMA,
    TITAN,
    ULTRACEMCO,
}

impl Ticker {
    /// Reference price the fallback generator moves around.
    pub fn base_price(&self) -> f64 {
        match self {
            Ticker::RELIANCE => 2450.0,
            Ticker::TCS => 3650.0,
            Ticker::HDFCBANK => 1650.0,
            Ticker::INFY => 1450.0,
            Ticker::ICICIBANK => 950.0,
            Ticker::HINDUNILVR => 2550.0,
            Ticker::ITC => 450.0,
            Ticker::SBIN => 600.0,
            Ticker::BHARTIARTL => 850.0,
            Ticker::KOTAKBANK => 1750.0,
            Ticker::LT => 3400.0,
            Ticker::AXISBANK => 1050.0,
            Ticker::ASIANPAINT => 3100.0,
            Ticker::MARUTI => 10500.0,
            Ticker::WIPRO => 450.0,
            Ticker::HCLTECH => 1300.0,
            Ticker::BAJFINANCE => 7000.0,
            Ticker::SUNPHARMA => 1150.0,
            Ticker::TITAN => 3200.0,
            Ticker::ULTRACEMCO => 8500.0,
        }
    }

    /// Company display name.
    pub fn company_name(&self) -> &'static str {
        match self {
            Ticker::RELIANCE => "Reliance Industries Ltd",
            Ticker::TCS => "Tata Consultancy Services Ltd",
            Ticker::HDFCBANK => "HDFC Bank Ltd",
            Ticker::INFY => "Infosys Ltd",
            Ticker::ICICIBANK => "ICICI Bank Ltd",
            Ticker::HINDUNILVR => "Hindustan Unilever Ltd",
            Ticker::ITC => "ITC Ltd",
            Ticker::SBIN => "State Bank of India",
            Ticker::BHARTIARTL => "Bharti Airtel Ltd",
            Ticker::KOTAKBANK => "Kotak Mahindra Bank Ltd",
            Ticker::LT => "Larsen & Toubro Ltd",
            Ticker::AXISBANK => "Axis Bank Ltd",
            Ticker::ASIANPAINT => "Asian Paints Ltd",
            Ticker::MARUTI => "Maruti Suzuki India Ltd",
            Ticker::WIPRO => "Wipro Ltd",
            Ticker::HCLTECH => "HCL Technologies Ltd",
            Ticker::BAJFINANCE => "Bajaj Finance Ltd",
            Ticker::SUNPHARMA => "Sun Pharmaceutical Industries Ltd",
            Ticker::TITAN => "Titan Company Ltd",
            Ticker::ULTRACEMCO => "UltraTech Cement Ltd",
        }
    }
}

/// Look up a symbol in the catalog.
pub fn lookup(symbol: &str) -> Option<Ticker> {
    Ticker::from_str(symbol.trim()).ok()
}

/// Base price for any symbol, catalog or not.
pub fn base_price_for(symbol: &str) -> f64 {
    lookup(symbol).map_or(DEFAULT_BASE_PRICE, |t| t.base_price())
}

/// Display name for any symbol; unknown symbols are shown as themselves.
pub fn company_name_for(symbol: &str) -> String {
    lookup(symbol).map_or_else(|| symbol.to_string(), |t| t.company_name().to_string())
}

/// Trim and upper-case a symbol; `None` when nothing is left.
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_ascii_uppercase())
    }
}

/// The static trending list as strings.
pub fn trending_symbols() -> Vec<String> {
    TRENDING.iter().map(|t| t.to_string()).collect()
}

fn is_well_formed(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '&' | '-' | '.' | '_'))
}
