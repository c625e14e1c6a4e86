//! Core state of the quote service.
//!
//! This module groups the data structures the service guards with locks:
//! - `cache` — symbol-keyed quotes with a time-to-live.
//! - `batch` — the pending batch and its completion handles.
//! - `fallback` — synthetic quote generator used when the provider fails.
//! - `subscriptions` — per-symbol callback lists and poller stop signals.

pub mod batch;
pub mod cache;
pub mod fallback;
pub mod subscriptions;
