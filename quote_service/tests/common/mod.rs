#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use quote_common::{Quote, QuoteError, Result};
use quote_service::{QuoteProvider, ServiceConfig};

/// How the scripted provider answers a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Quote for every requested symbol.
    AllOk,
    /// Errors on every call.
    Fail,
    /// Succeeds without any records.
    Empty,
    /// Builds a quote for the first symbol only, then errors overall.
    PartialThenError,
    /// Sleeps past any sensible timeout before answering.
    Hang(u64),
}

pub struct ScriptedProvider {
    script: Mutex<Script>,
    calls: AtomicUsize,
    batches: Mutex<Vec<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn new(script: Script) -> Self {
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn set_script(&self, script: Script) {
        *self.script.lock().unwrap() = script;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }
}

impl QuoteProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().unwrap().push(symbols.to_vec());
        let script = *self.script.lock().unwrap();

        match script {
            Script::AllOk => Ok(symbols.iter().map(|s| provider_quote(s, 500.0)).collect()),
            Script::Fail => Err(QuoteError::Http("connection refused".to_string())),
            Script::Empty => Ok(Vec::new()),
            Script::PartialThenError => {
                let _partial: Vec<Quote> =
                    symbols.iter().take(1).map(|s| provider_quote(s, 500.0)).collect();
                Err(QuoteError::Provider("upstream failed mid-batch".to_string()))
            }
            Script::Hang(ms) => {
                thread::sleep(Duration::from_millis(ms));
                Ok(symbols.iter().map(|s| provider_quote(s, 500.0)).collect())
            }
        }
    }
}

pub fn provider_quote(symbol: &str, price: f64) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        company_name: format!("{} Ltd", symbol),
        current_price: price,
        change_percent: 0.5,
        change: price * 0.005,
        high: price * 1.01,
        low: price * 0.99,
        previous_close: price - price * 0.005,
        volume: 42_000,
        exchange: "NSE".to_string(),
        last_updated: "2026-10-16T05:00:00Z".to_string(),
        timestamp: 0,
        is_fallback: false,
    }
}

/// Short windows so tests finish quickly.
pub fn fast_config() -> ServiceConfig {
    ServiceConfig {
        cache_ttl_ms: 60_000,
        batch_delay_ms: 30,
        fetch_timeout_ms: 500,
        poll_interval_ms: 50,
        wait_margin_ms: 200,
    }
}

/// Poll `condition` until it holds or `timeout` passes.
pub fn wait_until<F: Fn() -> bool>(timeout: Duration, condition: F) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}
