//! Quote Client — a command-line front end for the quote service. It collects symbols
//! from the command line, a watchlist file and/or the trending list, prints one quote
//! per symbol, and optionally keeps watching them through service subscriptions.
//!
//! Usage example (CLI):
//! ```bash
//! quote_client --endpoint https://db.example.com --api-key KEY --symbols TCS,INFY --watch
//! quote_client --path ./watchlist.txt --json
//! quote_client --market-status
//! ```
//!
//! Without `--endpoint` the client runs offline: every quote is simulated fallback
//! data and is marked as such in the output.
#![warn(missing_docs)]
mod args;
mod watch;

use crate::args::Args;
use clap::Parser;
use log::{error, info, warn};
use quote_common::tickers::{Ticker, TickerParser, trending_symbols};
use quote_common::{Quote, QuoteError, Result};
use quote_service::{
    HttpQuoteProvider, OfflineQuoteProvider, ProviderConfig, QuoteProvider, QuoteService,
    ServiceConfig,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Print one quote as a log line or a JSON line.
pub(crate) fn print_quote(quote: &Quote, json: bool) {
    if json {
        match serde_json::to_string(quote) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("Failed to serialize quote to JSON: {}", e),
        }
        return;
    }
    let marker = if quote.is_fallback { " [simulated]" } else { "" };
    info!(
        "QUOTE: {} ({}) Price={:.2} Change={:+.2} ({:+.2}%) Volume={} Time={}{}",
        quote.symbol,
        quote.exchange,
        quote.current_price,
        quote.change,
        quote.change_percent,
        quote.volume,
        quote.timestamp,
        marker
    );
}

fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();

    if args.market_status {
        info!("Market is {}", quote_common::market::market_status());
        return Ok(());
    }

    let symbols = collect_symbols(&args)?;
    if symbols.is_empty() {
        warn!("No symbols given; use --symbols, --path or --trending");
        return Ok(());
    }
    info!("Symbols: {:?}", symbols);

    let config = match &args.config {
        Some(path) => ServiceConfig::from_json_file(&normalize_path(path))?,
        None => ServiceConfig::default(),
    };
    let provider = build_provider(&args)?;
    let service = QuoteService::new(config, provider)?;

    for quote in service.get_multiple_quotes(&symbols) {
        print_quote(&quote, args.json);
    }
    if service.is_degraded() {
        warn!("Quote provider unavailable; prices above are simulated");
    }

    if args.watch {
        let shutdown = Arc::new(AtomicBool::new(false));
        {
            let shutdown = shutdown.clone();
            ctrlc::set_handler(move || {
                info!("Ctrl+C received. Shutting down client...");
                shutdown.store(true, Ordering::SeqCst);
            })
            .map_err(|e| QuoteError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;
        }
        watch::run(&service, &symbols, args.json, shutdown)?;
    }

    Ok(())
}

fn build_provider(args: &Args) -> Result<Arc<dyn QuoteProvider>> {
    match &args.endpoint {
        Some(endpoint) => {
            let endpoint = endpoint.trim().replace('"', "");
            let config = ProviderConfig::for_backend(&endpoint, args.api_key.clone());
            info!("Using quote proxy at {}", config.endpoint);
            Ok(Arc::new(HttpQuoteProvider::new(config)?))
        }
        None => {
            warn!("No --endpoint given; running offline with simulated quotes");
            Ok(Arc::new(OfflineQuoteProvider))
        }
    }
}

/// Symbols from `--symbols`, the watchlist file and the trending list, de-duplicated.
fn collect_symbols(args: &Args) -> Result<Vec<String>> {
    let mut symbols: Vec<String> = Vec::new();
    let mut push = |symbol: String| {
        let symbol = symbol.trim().to_ascii_uppercase();
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    };

    for symbol in &args.symbols {
        push(symbol.clone());
    }

    if let Some(raw) = &args.path {
        let file_path = normalize_path(raw);
        if !is_file_exist(&file_path) {
            return Err(QuoteError::ParseWatchlist(format!(
                "watchlist {} does not exist",
                file_path.display()
            )));
        }
        let file = File::open(&file_path)?;
        for symbol in Ticker::parse_from_file(BufReader::new(file))? {
            push(symbol);
        }
    }

    if args.trending {
        for symbol in trending_symbols() {
            push(symbol);
        }
    }

    Ok(symbols)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

/// Returns `true` if the provided path exists and is a regular file.
fn is_file_exist(path: &Path) -> bool {
    path.exists() && path.is_file()
}
