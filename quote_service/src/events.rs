//! Degraded-mode notifications.
//!
//! Quote lookups never fail: a provider outage turns into fallback data. To
//! let callers alert on that, the service broadcasts `ServiceEvent`s to every
//! registered listener using `crossbeam_channel`. Listeners register through
//! `EventBroadcaster::subscribe` and get their own unbounded receiver.
//!
//! Broadcast is best-effort: if sending to a listener fails, that listener is
//! removed.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, info};

use crate::service::lock;

/// Message sent to event listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceEvent {
    /// A batch failed and every symbol in it was answered with fallback data.
    Degraded {
        batch_id: u64,
        symbols: Vec<String>,
        reason: String,
    },
    /// The first batch to succeed after one or more degraded batches.
    Recovered { batch_id: u64 },
}

/// Fan-out of service events plus the current degraded flag.
#[derive(Default)]
pub struct EventBroadcaster {
    listeners: Mutex<Vec<Sender<ServiceEvent>>>,
    degraded: AtomicBool,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener.
    pub fn subscribe(&self) -> Receiver<ServiceEvent> {
        let (tx, rx) = unbounded();
        lock(&self.listeners).push(tx);
        rx
    }

    /// Whether the last resolved batch fell back.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    pub fn batch_failed(&self, batch_id: u64, symbols: Vec<String>, reason: String) {
        self.degraded.store(true, Ordering::SeqCst);
        self.publish(ServiceEvent::Degraded {
            batch_id,
            symbols,
            reason,
        });
    }

    pub fn batch_succeeded(&self, batch_id: u64) {
        if self.degraded.swap(false, Ordering::SeqCst) {
            info!("Quote provider recovered with batch {}", batch_id);
            self.publish(ServiceEvent::Recovered { batch_id });
        }
    }

    fn publish(&self, event: ServiceEvent) {
        let mut listeners = lock(&self.listeners);
        listeners.retain(|listener| listener.send(event.clone()).is_ok());
        debug!("Published {:?} to {} listener(s)", event, listeners.len());
    }
}
