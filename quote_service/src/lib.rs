//! Quote acquisition and caching service.
//!
//! `QuoteService` answers quote lookups for one or many symbols while keeping
//! remote traffic low and never failing a lookup. Internally, it wires together
//! these building blocks:
//!
//! - `model::cache` — quotes keyed by symbol, fresh for one TTL (60 s by default).
//! - `model::batch` — misses arriving within the batch window (500 ms) are grouped
//!   into one provider call; every caller waits on that batch's completion handle.
//! - `provider` — the remote source (`HttpQuoteProvider` for the backend proxy,
//!   `OfflineQuoteProvider` when none is configured).
//! - `model::fallback` — synthetic quotes used for a whole batch when the provider
//!   errors or times out; they are cached like real quotes and flagged `is_fallback`.
//! - `model::subscriptions` and `poller` — one polling thread per subscribed symbol
//!   (every 30 s by default) fanning quotes out to its callbacks.
//! - `events` — degraded/recovered notifications for callers that want to alert on
//!   provider outages.
//!
//! Concurrency uses OS threads and `crossbeam_channel`; shared state sits
//! behind `std::sync::Mutex`.

pub mod config;
pub mod events;
pub mod model;
mod poller;
pub mod provider;
pub mod service;

pub use config::{ProviderConfig, ServiceConfig};
pub use events::ServiceEvent;
pub use model::fallback::FallbackGenerator;
pub use provider::{HttpQuoteProvider, OfflineQuoteProvider, QuoteProvider};
pub use service::{QuoteService, Subscription};
