//! Watch mode: subscribe to every symbol and print updates until shutdown.
//!
//! Each symbol gets one subscription whose callback prints the quote. The
//! main thread parks on a short sleep loop so Ctrl+C (which flips `shutdown`)
//! is noticed promptly; degraded/recovered events are logged as they arrive.
use crate::print_quote;
use log::{info, warn};
use quote_common::Result;
use quote_service::{QuoteService, ServiceEvent, Subscription};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

/// How often the main loop checks for shutdown and service events.
const INTERVAL_MS: u64 = 200;

/// Subscribe to `symbols` and block until `shutdown` is set.
pub fn run(
    service: &QuoteService,
    symbols: &[String],
    json: bool,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    let events = service.events();
    let mut subscriptions: Vec<Subscription> = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        let subscription = service.subscribe(symbol, move |quote| print_quote(quote, json))?;
        info!("Watching {} (subscription {})", subscription.symbol(), subscription.id());
        subscriptions.push(subscription);
    }

    info!(
        "Polling every {:?}. Press Ctrl+C to exit.",
        service.config().poll_interval()
    );
    while !shutdown.load(Ordering::Relaxed) {
        thread::sleep(Duration::from_millis(INTERVAL_MS));
        for event in events.try_iter() {
            match event {
                ServiceEvent::Degraded {
                    symbols, reason, ..
                } => warn!("Simulated data for {:?}: {}", symbols, reason),
                ServiceEvent::Recovered { .. } => info!("Live quotes restored"),
            }
        }
    }

    info!("Watch loop stopping...");
    for subscription in subscriptions {
        subscription.unsubscribe();
    }
    Ok(())
}
