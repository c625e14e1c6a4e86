//! Synthetic fallback quotes.
//!
//! When the provider cannot be reached the service still hands the UI a
//! renderable quote. The generator moves the symbol's base price by a random
//! percentage and derives the rest of the snapshot from it. The numbers carry
//! no market meaning; `is_fallback` marks them.
//!
//! Randomness comes from an owned `StdRng` so tests can seed it.

use chrono::Utc;
use quote_common::Quote;
use quote_common::tickers::{base_price_for, company_name_for};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest move away from the base price, in percent.
pub const MAX_MOVE_PERCENT: f64 = 2.0;
/// Exchange reported on every fallback quote.
pub const FALLBACK_EXCHANGE: &str = "NSE";

const VOLUME_MIN: u64 = 100_000;
const VOLUME_MAX: u64 = 1_100_000;
const RANGE_FACTOR: f64 = 0.02;

/// Generator of fallback quotes.
pub struct FallbackGenerator {
    rng: StdRng,
}

impl FallbackGenerator {
    /// Generator seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Generator with a fixed seed, for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Build a fallback quote for `symbol`.
    ///
    /// The price moves uniformly within `±MAX_MOVE_PERCENT` of the base price;
    /// high/low sit 2% around the new price and the previous close is the base.
    pub fn generate(&mut self, symbol: &str) -> Quote {
        let base_price = base_price_for(symbol);
        let change_percent: f64 = self
            .rng
            .random_range(-MAX_MOVE_PERCENT..=MAX_MOVE_PERCENT);
        let current_price = base_price * (1.0 + change_percent / 100.0);
        let volume = self.rng.random_range(VOLUME_MIN..VOLUME_MAX);

        Quote {
            symbol: symbol.to_string(),
            company_name: company_name_for(symbol),
            current_price,
            change_percent,
            change: current_price - base_price,
            high: current_price * (1.0 + RANGE_FACTOR),
            low: current_price * (1.0 - RANGE_FACTOR),
            previous_close: base_price,
            volume,
            exchange: FALLBACK_EXCHANGE.to_string(),
            last_updated: Utc::now().to_rfc3339(),
            timestamp: 0,
            is_fallback: true,
        }
    }
}

impl Default for FallbackGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reliance_stays_within_two_percent() {
        let mut generator = FallbackGenerator::with_seed(7);
        let base = 2450.0;
        for _ in 0..500 {
            let quote = generator.generate("RELIANCE");
            assert!(quote.current_price >= base * 0.98 && quote.current_price <= base * 1.02);
            assert!((-2.0..=2.0).contains(&quote.change_percent));
            assert_eq!(quote.previous_close, base);
            assert!(quote.is_fallback);
        }
    }

    #[test]
    fn derived_fields_follow_price() {
        let mut generator = FallbackGenerator::with_seed(11);
        let quote = generator.generate("TCS");

        assert!((quote.change - (quote.current_price - 3650.0)).abs() < 1e-9);
        assert!((quote.high - quote.current_price * 1.02).abs() < 1e-9);
        assert!((quote.low - quote.current_price * 0.98).abs() < 1e-9);
        assert!((VOLUME_MIN..VOLUME_MAX).contains(&quote.volume));
        assert_eq!(quote.exchange, "NSE");
        assert_eq!(quote.company_name, "Tata Consultancy Services Ltd");
    }

    #[test]
    fn same_seed_same_numbers() {
        let a = FallbackGenerator::with_seed(42).generate("INFY");
        let b = FallbackGenerator::with_seed(42).generate("INFY");
        assert_eq!(a.current_price, b.current_price);
        assert_eq!(a.volume, b.volume);
    }

    #[test]
    fn unknown_symbol_uses_default_base() {
        let quote = FallbackGenerator::with_seed(3).generate("ACME");
        assert_eq!(quote.previous_close, 1000.0);
        assert_eq!(quote.company_name, "ACME");
    }
}
