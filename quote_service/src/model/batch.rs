//! Pending batch of symbols awaiting one grouped provider call.
//!
//! The first cache miss opens a batch; later misses join it until the batch
//! timer fires and the resolver takes the whole thing. Every caller that joins
//! gets a `BatchWaiter` which completes when that exact batch has been written
//! to the cache, successfully or with fallback data.

use std::collections::BTreeSet;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use log::warn;

/// Symbols collected during one batch window plus the callers waiting on them.
pub struct PendingBatch {
    id: u64,
    symbols: BTreeSet<String>,
    waiters: Vec<Sender<()>>,
}

impl PendingBatch {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            symbols: BTreeSet::new(),
            waiters: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Add symbols to the batch and register one waiter for all of them.
    pub fn join<I>(&mut self, symbols: I) -> BatchWaiter
    where
        I: IntoIterator<Item = String>,
    {
        self.symbols.extend(symbols);
        let (done_tx, done_rx) = bounded(1);
        self.waiters.push(done_tx);
        BatchWaiter {
            batch_id: self.id,
            done: done_rx,
        }
    }

    pub fn symbols(&self) -> Vec<String> {
        self.symbols.iter().cloned().collect()
    }

    /// Release every waiter. Consumes the batch so it completes exactly once.
    pub fn complete(self) {
        for waiter in self.waiters {
            // A waiter that already gave up has dropped its receiver.
            let _ = waiter.send(());
        }
    }
}

/// Completion handle of one batch.
pub struct BatchWaiter {
    batch_id: u64,
    done: Receiver<()>,
}

impl BatchWaiter {
    /// Block until the batch completes or `deadline` elapses.
    ///
    /// Returns `true` when the batch completed. A dropped batch also counts as
    /// completed; the caller reads the cache either way.
    pub fn wait(self, deadline: Duration) -> bool {
        match self.done.recv_timeout(deadline) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "Batch {} did not complete within {:?}",
                    self.batch_id, deadline
                );
                false
            }
        }
    }
}
