//! Error types shared between the quote service and its clients.
//!
//! The `QuoteError` enum unifies failures from I/O, serialization, the remote
//! quote proxy, channel communication and configuration, allowing crates to
//! propagate a single error type. The public quote lookups never surface it:
//! provider failures are turned into fallback data inside the service.
use std::io;

use thiserror::Error;

/// Unified error type shared by the service and the client.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// I/O error originating from the standard library or files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Transport-level failure talking to the quote proxy (connect, non-2xx, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The proxy answered but reported an error payload (`success: false`).
    #[error("Provider error: {0}")]
    Provider(String),

    /// The provider did not answer within the configured fetch timeout.
    #[error("Provider timed out after {0} ms")]
    Timeout(u64),

    /// Channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// Empty or otherwise unusable symbol.
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// Error while parsing a watchlist file into symbols.
    #[error("Parse watchlist file error: {0}")]
    ParseWatchlist(String),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}
