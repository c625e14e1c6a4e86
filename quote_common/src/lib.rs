//!
//! Common types and utilities shared by the quote service and its clients.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` used across the workspace.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `quote` — the `Quote` snapshot returned by the service.
//! - `tickers` — known symbols, fallback base prices and watchlist parsing.
//! - `request` — request/response payloads exchanged with the quote proxy.
//! - `market` — trading-window check for the exchange.
//! - `net` — proxy endpoint constants and small helpers.
#![warn(missing_docs)]
pub mod error;
pub mod market;
pub mod net;
pub mod quote;
pub mod request;
pub mod result;
pub mod tickers;

pub use error::QuoteError;
pub use market::MarketStatus;
pub use quote::Quote;
pub use result::Result;
