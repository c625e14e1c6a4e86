//! Subscription registry: one poller per symbol, many callbacks.
//!
//! Each symbol with at least one subscriber owns a stop channel for its poller
//! and an ordered list of callbacks. Adding the first callback for a symbol
//! asks the caller to start a poller; removing the last one signals that
//! poller to stop. Other symbols and other callbacks are never touched.
//!
//! The registry is not synchronized; the service wraps it in a `Mutex` and
//! never invokes callbacks while holding it.

use std::collections::HashMap;
use std::sync::Arc;

use crossbeam_channel::Sender;
use quote_common::Quote;

/// Callback invoked with every polled quote of its symbol.
pub type QuoteCallback = Arc<dyn Fn(&Quote) + Send + Sync>;

struct SymbolSubscribers {
    callbacks: Vec<(u64, QuoteCallback)>,
    stop: Sender<()>,
}

/// Outcome of `SubscriptionRegistry::add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub id: u64,
    /// `true` when this is the first subscriber and a poller must be started.
    pub start_poller: bool,
}

#[derive(Default)]
pub struct SubscriptionRegistry {
    next_id: u64,
    symbols: HashMap<String, SymbolSubscribers>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `symbol`.
    ///
    /// `stop` is kept only when the symbol has no poller yet; otherwise it is
    /// dropped and the existing poller keeps serving the new callback.
    pub fn add(&mut self, symbol: &str, callback: QuoteCallback, stop: Sender<()>) -> Registration {
        self.next_id += 1;
        let id = self.next_id;

        match self.symbols.get_mut(symbol) {
            Some(entry) => {
                entry.callbacks.push((id, callback));
                Registration {
                    id,
                    start_poller: false,
                }
            }
            None => {
                self.symbols.insert(
                    symbol.to_string(),
                    SymbolSubscribers {
                        callbacks: vec![(id, callback)],
                        stop,
                    },
                );
                Registration {
                    id,
                    start_poller: true,
                }
            }
        }
    }

    /// Remove callback `id` from `symbol`; stops the poller when it was the last one.
    ///
    /// Returns `false` if the callback was not registered.
    pub fn remove(&mut self, symbol: &str, id: u64) -> bool {
        let Some(entry) = self.symbols.get_mut(symbol) else {
            return false;
        };
        let before = entry.callbacks.len();
        entry.callbacks.retain(|(cb_id, _)| *cb_id != id);
        let removed = entry.callbacks.len() != before;

        if entry.callbacks.is_empty() {
            if let Some(entry) = self.symbols.remove(symbol) {
                // The poller may already be gone.
                let _ = entry.stop.send(());
            }
        }
        removed
    }

    /// Callbacks currently registered for `symbol`, in registration order.
    pub fn callbacks(&self, symbol: &str) -> Vec<QuoteCallback> {
        self.symbols
            .get(symbol)
            .map(|entry| entry.callbacks.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self, symbol: &str) -> usize {
        self.symbols.get(symbol).map_or(0, |entry| entry.callbacks.len())
    }

    /// Number of symbols with a running poller.
    pub fn polled_symbols(&self) -> usize {
        self.symbols.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    fn noop() -> QuoteCallback {
        Arc::new(|_: &Quote| {})
    }

    #[test]
    fn only_first_subscriber_starts_poller() {
        let mut registry = SubscriptionRegistry::new();
        let (stop_a, _rx_a) = bounded(1);
        let (stop_b, _rx_b) = bounded(1);

        let first = registry.add("TCS", noop(), stop_a);
        let second = registry.add("TCS", noop(), stop_b);

        assert!(first.start_poller);
        assert!(!second.start_poller);
        assert_ne!(first.id, second.id);
        assert_eq!(registry.subscriber_count("TCS"), 2);
        assert_eq!(registry.polled_symbols(), 1);
    }

    #[test]
    fn last_removal_stops_poller() {
        let mut registry = SubscriptionRegistry::new();
        let (stop, stop_rx) = bounded(1);
        let (unused, _unused_rx) = bounded(1);
        let a = registry.add("INFY", noop(), stop);
        let b = registry.add("INFY", noop(), unused);

        assert!(registry.remove("INFY", a.id));
        assert!(stop_rx.try_recv().is_err());
        assert_eq!(registry.callbacks("INFY").len(), 1);

        assert!(registry.remove("INFY", b.id));
        assert!(stop_rx.try_recv().is_ok());
        assert_eq!(registry.polled_symbols(), 0);
    }

    #[test]
    fn removing_unknown_id_is_harmless() {
        let mut registry = SubscriptionRegistry::new();
        let (stop, stop_rx) = bounded(1);
        registry.add("SBIN", noop(), stop);

        assert!(!registry.remove("SBIN", 999));
        assert!(!registry.remove("ITC", 1));
        assert_eq!(registry.subscriber_count("SBIN"), 1);
        assert!(stop_rx.try_recv().is_err());
    }
}
