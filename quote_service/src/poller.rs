//! Per-symbol polling loop behind subscriptions.
//!
//! One thread per subscribed symbol ticks every poll interval, looks the
//! quote up through the service (cache first, batch on miss) and fans the
//! result out to every callback registered for the symbol at that moment.
//! The loop terminates when either:
//! - a stop signal arrives (or its sender is dropped) after the last unsubscribe, or
//! - the service itself has been dropped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, select, tick};
use log::{debug, info};
use quote_common::Result;

use crate::service::ServiceInner;

/// Keeps the live-poller count; the thread owns it, so a failed spawn undoes the increment too.
struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn new(live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        LiveGuard(live)
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub(crate) fn spawn_poller(
    service: Weak<ServiceInner>,
    symbol: String,
    period: Duration,
    stop_rx: Receiver<()>,
    live: Arc<AtomicUsize>,
) -> Result<JoinHandle<()>> {
    let guard = LiveGuard::new(live);
    let handle = thread::Builder::new()
        .name(format!("quote-poll-{}", symbol))
        .spawn(move || {
            let _guard = guard;
            info!("Poller for {} started, period {:?}", symbol, period);
            let ticker = tick(period);

            loop {
                select! {
                    recv(stop_rx) -> _ => break,
                    recv(ticker) -> _ => {
                        let Some(service) = service.upgrade() else {
                            debug!("Service dropped, poller for {} exiting", symbol);
                            break;
                        };
                        service.poll_once(&symbol);
                    }
                }
            }
            info!("Poller for {} stopped", symbol);
        })?;
    Ok(handle)
}
