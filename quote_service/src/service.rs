//! The quote service: cache, batching, fallback and subscriptions wired together.
//!
//! Lookups flow through three stages:
//!
//! - Cache — a quote younger than the TTL is returned immediately.
//! - Pending batch — misses join the open batch (opening one and scheduling its
//!   resolution after the batch delay if none is open) and block on that batch's
//!   completion handle.
//! - Resolution — the batch timer takes the whole batch, makes one provider call
//!   bounded by the fetch timeout and writes either every returned quote or a
//!   fallback quote for every symbol into the cache, then releases the waiters.
//!
//! Concurrency:
//! - Cache, pending batch, fallback generator and subscription registry each sit
//!   behind their own `Mutex`; no lock is held across a provider call or a callback.
//! - Batch timers and provider calls run on short-lived threads; subscriptions run
//!   one long-lived poller thread per symbol.
//! - Poisoned locks are recovered: the guarded data stays consistent because every
//!   critical section is a plain insert/remove.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, bounded};
use log::{debug, error, info, warn};
use quote_common::market::{self, MarketStatus};
use quote_common::tickers::{normalize_symbol, trending_symbols};
use quote_common::{Quote, QuoteError, Result};

use crate::config::ServiceConfig;
use crate::events::{EventBroadcaster, ServiceEvent};
use crate::model::batch::{BatchWaiter, PendingBatch};
use crate::model::cache::QuoteCache;
use crate::model::fallback::FallbackGenerator;
use crate::model::subscriptions::{QuoteCallback, SubscriptionRegistry};
use crate::poller::spawn_poller;
use crate::provider::QuoteProvider;

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a quote service. Cloning is cheap and shares all state.
#[derive(Clone)]
pub struct QuoteService {
    inner: Arc<ServiceInner>,
}

pub(crate) struct ServiceInner {
    config: ServiceConfig,
    provider: Arc<dyn QuoteProvider>,
    cache: Mutex<QuoteCache>,
    pending: Mutex<Option<PendingBatch>>,
    next_batch_id: AtomicU64,
    fallback: Mutex<FallbackGenerator>,
    subscriptions: Mutex<SubscriptionRegistry>,
    live_pollers: Arc<AtomicUsize>,
    events: EventBroadcaster,
}

impl QuoteService {
    /// Create a service with an OS-seeded fallback generator.
    pub fn new(config: ServiceConfig, provider: Arc<dyn QuoteProvider>) -> Result<Self> {
        Self::with_fallback(config, provider, FallbackGenerator::new())
    }

    /// Create a service with a caller-supplied fallback generator.
    pub fn with_fallback(
        config: ServiceConfig,
        provider: Arc<dyn QuoteProvider>,
        fallback: FallbackGenerator,
    ) -> Result<Self> {
        config.validate()?;
        info!(
            "Quote service using provider '{}' (ttl {:?}, batch delay {:?})",
            provider.name(),
            config.cache_ttl(),
            config.batch_delay()
        );
        Ok(Self {
            inner: Arc::new(ServiceInner {
                cache: Mutex::new(QuoteCache::new(config.cache_ttl())),
                config,
                provider,
                pending: Mutex::new(None),
                next_batch_id: AtomicU64::new(1),
                fallback: Mutex::new(fallback),
                subscriptions: Mutex::new(SubscriptionRegistry::new()),
                live_pollers: Arc::new(AtomicUsize::new(0)),
                events: EventBroadcaster::new(),
            }),
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    /// Quote for one symbol; `None` for a blank symbol.
    ///
    /// Blocks for at most the batch delay plus the fetch timeout (plus margin)
    /// on a cache miss. Provider failures come back as fallback quotes.
    pub fn get_quote(&self, symbol: &str) -> Option<Quote> {
        self.inner.get_quote(symbol)
    }

    /// Quotes for several symbols, in request order, blank symbols skipped.
    ///
    /// All misses are put into the same batch, so they resolve together.
    pub fn get_multiple_quotes<S: AsRef<str>>(&self, symbols: &[S]) -> Vec<Quote> {
        self.inner.get_multiple_quotes(symbols)
    }

    /// Quotes for the curated trending list.
    pub fn trending_quotes(&self) -> Vec<Quote> {
        self.get_multiple_quotes(&trending_symbols())
    }

    /// The curated trending list.
    pub fn trending_symbols(&self) -> Vec<String> {
        trending_symbols()
    }

    /// Market status right now.
    pub fn market_status(&self) -> MarketStatus {
        market::market_status()
    }

    /// Poll `symbol` every poll interval and hand each quote to `callback`.
    ///
    /// All subscribers of a symbol share one poller. Dropping the returned
    /// `Subscription` (or calling `unsubscribe`) removes only this callback.
    pub fn subscribe<F>(&self, symbol: &str, callback: F) -> Result<Subscription>
    where
        F: Fn(&Quote) + Send + Sync + 'static,
    {
        let symbol =
            normalize_symbol(symbol).ok_or_else(|| QuoteError::InvalidSymbol(symbol.to_string()))?;
        let callback: QuoteCallback = Arc::new(callback);
        let (stop_tx, stop_rx) = bounded(1);

        let mut registry = lock(&self.inner.subscriptions);
        let registration = registry.add(&symbol, callback, stop_tx);
        if registration.start_poller {
            if let Err(e) = spawn_poller(
                Arc::downgrade(&self.inner),
                symbol.clone(),
                self.inner.config.poll_interval(),
                stop_rx,
                Arc::clone(&self.inner.live_pollers),
            ) {
                error!("Failed to start poller for {}: {}", symbol, e);
                registry.remove(&symbol, registration.id);
                return Err(e);
            }
        }
        debug!(
            "Subscription {} added for {} ({} subscriber(s))",
            registration.id,
            symbol,
            registry.subscriber_count(&symbol)
        );

        Ok(Subscription {
            id: registration.id,
            symbol,
            service: Arc::downgrade(&self.inner),
            active: true,
        })
    }

    /// Number of callbacks registered for `symbol`.
    pub fn subscriber_count(&self, symbol: &str) -> usize {
        normalize_symbol(symbol)
            .map_or(0, |s| lock(&self.inner.subscriptions).subscriber_count(&s))
    }

    /// Number of symbols with a running poller.
    pub fn polled_symbols(&self) -> usize {
        lock(&self.inner.subscriptions).polled_symbols()
    }

    /// Number of poller threads still running; lags `polled_symbols` until a stopped poller exits.
    pub fn running_pollers(&self) -> usize {
        self.inner.live_pollers.load(Ordering::SeqCst)
    }

    /// Listen for degraded/recovered notifications.
    pub fn events(&self) -> Receiver<ServiceEvent> {
        self.inner.events.subscribe()
    }

    /// Whether the most recent batch was answered with fallback data.
    pub fn is_degraded(&self) -> bool {
        self.inner.events.is_degraded()
    }

    /// Cached quote for `symbol` if still fresh, without fetching.
    pub fn cached_quote(&self, symbol: &str) -> Option<Quote> {
        let symbol = normalize_symbol(symbol)?;
        lock(&self.inner.cache).get_fresh(&symbol, Instant::now())
    }

    /// Drop expired cache entries; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        lock(&self.inner.cache).purge_expired(Instant::now())
    }

    pub fn clear_cache(&self) {
        lock(&self.inner.cache).clear();
    }

    pub fn cache_len(&self) -> usize {
        lock(&self.inner.cache).len()
    }
}

impl ServiceInner {
    fn get_quote(self: &Arc<Self>, symbol: &str) -> Option<Quote> {
        let symbol = normalize_symbol(symbol)?;

        if let Some(quote) = lock(&self.cache).get_fresh(&symbol, Instant::now()) {
            debug!("Cache hit for {}", symbol);
            return Some(quote);
        }

        let waiter = self.enqueue(vec![symbol.clone()]);
        waiter.wait(self.config.wait_deadline());
        // Entries the batch did not refresh are stale and stay unanswered.
        lock(&self.cache).get_fresh(&symbol, Instant::now())
    }

    fn get_multiple_quotes<S: AsRef<str>>(self: &Arc<Self>, symbols: &[S]) -> Vec<Quote> {
        let requested: Vec<String> = symbols
            .iter()
            .filter_map(|s| normalize_symbol(s.as_ref()))
            .collect();

        let mut misses: Vec<String> = Vec::new();
        {
            let cache = lock(&self.cache);
            let now = Instant::now();
            for symbol in &requested {
                if cache.get_fresh(symbol, now).is_none() && !misses.contains(symbol) {
                    misses.push(symbol.clone());
                }
            }
        }

        if !misses.is_empty() {
            debug!("Batching {} uncached symbol(s): {:?}", misses.len(), misses);
            let waiter = self.enqueue(misses);
            waiter.wait(self.config.wait_deadline());
        }

        let cache = lock(&self.cache);
        let now = Instant::now();
        requested
            .iter()
            .filter_map(|symbol| cache.get_fresh(symbol, now))
            .collect()
    }

    /// Add `symbols` to the open batch, opening one if needed.
    fn enqueue(self: &Arc<Self>, symbols: Vec<String>) -> BatchWaiter {
        let mut pending = lock(&self.pending);
        if let Some(batch) = pending.as_mut() {
            return batch.join(symbols);
        }

        let batch_id = self.next_batch_id.fetch_add(1, Ordering::Relaxed);
        let mut batch = PendingBatch::new(batch_id);
        let waiter = batch.join(symbols);
        *pending = Some(batch);
        drop(pending);

        self.schedule_resolution(batch_id);
        waiter
    }

    fn schedule_resolution(self: &Arc<Self>, batch_id: u64) {
        let service = Arc::clone(self);
        let delay = self.config.batch_delay();
        let spawned = thread::Builder::new()
            .name(format!("quote-batch-{}", batch_id))
            .spawn(move || {
                thread::sleep(delay);
                service.resolve_batch(batch_id);
            });

        if let Err(e) = spawned {
            error!("Failed to start batch timer {}: {}; resolving inline", batch_id, e);
            self.resolve_batch(batch_id);
        }
    }

    /// Take the open batch if it is still `batch_id`, fetch it and release its waiters.
    fn resolve_batch(&self, batch_id: u64) {
        let batch = {
            let mut pending = lock(&self.pending);
            if pending.as_ref().map(PendingBatch::id) != Some(batch_id) {
                return;
            }
            match pending.take() {
                Some(batch) => batch,
                None => return,
            }
        };

        let symbols = batch.symbols();
        info!("Resolving batch {} with {} symbol(s)", batch_id, symbols.len());

        match self.fetch_with_timeout(&symbols) {
            Ok(quotes) => {
                let now = Instant::now();
                let mut cache = lock(&self.cache);
                for mut quote in quotes {
                    let Some(symbol) = normalize_symbol(&quote.symbol) else {
                        warn!("Provider returned a quote without symbol; skipped");
                        continue;
                    };
                    quote.symbol = symbol;
                    quote.is_fallback = false;
                    cache.insert(quote, now);
                }
                drop(cache);
                self.events.batch_succeeded(batch_id);
            }
            Err(e) => {
                warn!(
                    "Batch {} failed ({}); serving fallback data for {:?}",
                    batch_id, e, symbols
                );
                let now = Instant::now();
                let mut generator = lock(&self.fallback);
                let mut cache = lock(&self.cache);
                for symbol in &symbols {
                    cache.insert(generator.generate(symbol), now);
                }
                drop(cache);
                drop(generator);
                self.events.batch_failed(batch_id, symbols, e.to_string());
            }
        }

        batch.complete();
    }

    /// One provider call, raced against the fetch timeout.
    fn fetch_with_timeout(&self, symbols: &[String]) -> Result<Vec<Quote>> {
        let (result_tx, result_rx) = bounded(1);
        let provider = Arc::clone(&self.provider);
        let request = symbols.to_vec();

        thread::Builder::new()
            .name("quote-fetch".to_string())
            .spawn(move || {
                // The receiver is gone if the call outlived the timeout.
                let _ = result_tx.send(provider.fetch_quotes(&request));
            })?;

        let timeout: Duration = self.config.fetch_timeout();
        match result_rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(QuoteError::Timeout(self.config.fetch_timeout_ms)),
            Err(RecvTimeoutError::Disconnected) => Err(QuoteError::ChannelRecv(
                "provider worker exited without a result".to_string(),
            )),
        }
    }

    /// One poll tick for `symbol`: look the quote up and fan it out.
    pub(crate) fn poll_once(self: &Arc<Self>, symbol: &str) {
        let Some(quote) = self.get_quote(symbol) else {
            return;
        };
        let callbacks = lock(&self.subscriptions).callbacks(symbol);
        debug!("Delivering {} to {} subscriber(s)", symbol, callbacks.len());
        for callback in callbacks {
            callback(&quote);
        }
    }

    fn unsubscribe(&self, symbol: &str, id: u64) {
        if lock(&self.subscriptions).remove(symbol, id) {
            debug!("Subscription {} removed for {}", id, symbol);
        }
    }
}

/// Registration of one callback; unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    symbol: String,
    service: Weak<ServiceInner>,
    active: bool,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Stop delivering to this callback. Other subscribers are unaffected.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(service) = self.service.upgrade() {
            service.unsubscribe(&self.symbol, self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
