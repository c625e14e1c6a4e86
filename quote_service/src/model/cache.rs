//! In-memory quote cache with a fixed time-to-live.
//!
//! This module keeps the last quote written for each symbol together with the
//! `Instant` it was written. It exposes four core operations:
//!
//! - `QuoteCache::insert(quote, now)` — store (or overwrite) the quote for its symbol.
//! - `QuoteCache::get_fresh(symbol, now)` — return the quote if it is younger than the TTL.
//! - `QuoteCache::get(symbol)` — return whatever is stored, fresh or not.
//! - `QuoteCache::purge_expired(now)` — drop entries older than the TTL.
//!
//! Design notes:
//! - Age is measured with `std::time::Instant`, which is monotonic; the quote's own
//!   `timestamp` field records wall-clock cache-write time for callers.
//! - The cache is not synchronized; the service wraps it in a `Mutex`.
//! - There is no capacity bound: the symbol universe is whatever the UI asks for.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use quote_common::Quote;

struct CacheEntry {
    quote: Quote,
    cached_at: Instant,
}

/// Symbol-keyed quote store with expiry.
pub struct QuoteCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
}

impl QuoteCache {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Store `quote` under its symbol, stamping it with the current wall-clock time.
    pub fn insert(&mut self, quote: Quote, now: Instant) -> Quote {
        let quote = quote.stamped();
        self.entries.insert(
            quote.symbol.clone(),
            CacheEntry {
                quote: quote.clone(),
                cached_at: now,
            },
        );
        quote
    }

    /// Quote for `symbol` if it was cached less than one TTL before `now`.
    pub fn get_fresh(&self, symbol: &str, now: Instant) -> Option<Quote> {
        self.entries
            .get(symbol)
            .filter(|entry| now.saturating_duration_since(entry.cached_at) < self.ttl)
            .map(|entry| entry.quote.clone())
    }

    /// Quote for `symbol` regardless of age.
    pub fn get(&self, symbol: &str) -> Option<Quote> {
        self.entries.get(symbol).map(|entry| entry.quote.clone())
    }

    /// Drop stale entries and return how many were removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.cached_at) < ttl);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
