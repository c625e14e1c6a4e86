//! Command-line arguments for the Quote Client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Symbols to look up, comma separated (e.g. `TCS,INFY`).
    #[clap(long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Path to a watchlist file with symbols.
    /// Symbols may be separated by commas, spaces, or new lines.
    #[clap(long)]
    pub path: Option<String>,

    /// Include the curated trending list.
    #[clap(long)]
    pub trending: bool,

    /// Print whether the market is open and exit.
    #[clap(long)]
    pub market_status: bool,

    /// Keep polling the symbols and print every update until Ctrl+C.
    #[clap(long)]
    pub watch: bool,

    /// Base URL of the backend hosting the quote function.
    /// Without it the client runs offline and every quote is simulated.
    #[clap(long)]
    pub endpoint: Option<String>,

    /// API key for the backend.
    #[clap(long)]
    pub api_key: Option<String>,

    /// JSON file with service timings (cache_ttl_ms, batch_delay_ms, ...).
    #[clap(long)]
    pub config: Option<String>,

    /// Print quotes as JSON lines instead of text.
    #[clap(long)]
    pub json: bool,
}
