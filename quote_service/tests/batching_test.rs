use std::sync::Arc;
use std::thread;
use std::time::Duration;

use quote_service::{FallbackGenerator, QuoteService, ServiceConfig, ServiceEvent};

mod common;
use common::{Script, ScriptedProvider, fast_config};

fn service_with(script: Script, config: ServiceConfig) -> (QuoteService, Arc<ScriptedProvider>) {
    let provider = Arc::new(ScriptedProvider::new(script));
    let service =
        QuoteService::with_fallback(config, provider.clone(), FallbackGenerator::with_seed(5))
            .unwrap();
    (service, provider)
}

#[test]
fn failed_transport_turns_whole_batch_into_fallback() {
    let (service, provider) = service_with(Script::PartialThenError, fast_config());

    let quotes = service.get_multiple_quotes(&["TCS", "INFY"]);

    assert_eq!(quotes.len(), 2);
    assert!(quotes.iter().all(|q| q.is_fallback));
    assert_eq!(quotes[0].symbol, "TCS");
    assert_eq!(quotes[1].symbol, "INFY");
    assert_eq!(provider.calls(), 1);
}

#[test]
fn successful_batch_is_never_mixed() {
    let (service, provider) = service_with(Script::AllOk, fast_config());

    let quotes = service.get_multiple_quotes(&["RELIANCE", "TCS", "HDFCBANK"]);

    assert_eq!(quotes.len(), 3);
    assert!(quotes.iter().all(|q| !q.is_fallback));
    assert_eq!(provider.batches(), vec![vec!["HDFCBANK", "RELIANCE", "TCS"]]);
}

#[test]
fn concurrent_lookups_in_one_window_share_a_fetch() {
    let config = ServiceConfig {
        batch_delay_ms: 250,
        ..fast_config()
    };
    let (service, provider) = service_with(Script::AllOk, config);

    let handles: Vec<_> = ["SBIN", "ITC", "WIPRO", "SBIN"]
        .into_iter()
        .map(|symbol| {
            let service = service.clone();
            thread::spawn(move || service.get_quote(symbol))
        })
        .collect();
    let quotes: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();

    assert_eq!(provider.calls(), 1);
    assert!(quotes.iter().all(|q| !q.is_fallback));
    assert_eq!(provider.batches()[0], vec!["ITC", "SBIN", "WIPRO"]);
}

#[test]
fn lookups_within_ttl_return_identical_data() {
    let (service, provider) = service_with(Script::AllOk, fast_config());

    let first = service.get_quote("KOTAKBANK").unwrap();
    let second = service.get_quote("KOTAKBANK").unwrap();

    assert_eq!(first, second);
    assert_eq!(first.timestamp, second.timestamp);
    assert_eq!(provider.calls(), 1);
}

#[test]
fn expired_entry_triggers_new_fetch() {
    let config = ServiceConfig {
        cache_ttl_ms: 100,
        ..fast_config()
    };
    let (service, provider) = service_with(Script::AllOk, config);

    service.get_quote("LT").unwrap();
    thread::sleep(Duration::from_millis(150));
    assert!(service.cached_quote("LT").is_none());
    service.get_quote("LT").unwrap();

    assert_eq!(provider.calls(), 2);
}

#[test]
fn expired_entry_is_not_returned_when_refresh_omits_it() {
    let config = ServiceConfig {
        cache_ttl_ms: 100,
        ..fast_config()
    };
    let (service, provider) = service_with(Script::AllOk, config);

    assert!(service.get_quote("TCS").is_some());
    provider.set_script(Script::Empty);
    thread::sleep(Duration::from_millis(150));

    assert!(service.get_quote("TCS").is_none());
    assert!(service.get_multiple_quotes(&["TCS"]).is_empty());
    assert_eq!(provider.calls(), 3);
}

#[test]
fn fallback_is_cached_and_not_retried_within_ttl() {
    let (service, provider) = service_with(Script::Fail, fast_config());

    let first = service.get_quote("ICICIBANK").unwrap();
    provider.set_script(Script::AllOk);
    let second = service.get_quote("ICICIBANK").unwrap();

    assert!(first.is_fallback);
    assert_eq!(first, second);
    assert_eq!(provider.calls(), 1);
}

#[test]
fn slow_provider_times_out_into_fallback() {
    let config = ServiceConfig {
        fetch_timeout_ms: 50,
        ..fast_config()
    };
    let (service, _provider) = service_with(Script::Hang(400), config);
    let events = service.events();

    let quote = service.get_quote("MARUTI").unwrap();

    assert!(quote.is_fallback);
    match events.recv_timeout(Duration::from_secs(1)).unwrap() {
        ServiceEvent::Degraded { reason, .. } => assert!(reason.contains("timed out")),
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn recovery_is_announced_after_outage() {
    let (service, provider) = service_with(Script::Fail, fast_config());
    let events = service.events();

    assert!(service.get_quote("TITAN").unwrap().is_fallback);
    provider.set_script(Script::AllOk);
    assert!(!service.get_quote("WIPRO").unwrap().is_fallback);

    assert!(matches!(
        events.recv_timeout(Duration::from_secs(1)).unwrap(),
        ServiceEvent::Degraded { .. }
    ));
    assert!(matches!(
        events.recv_timeout(Duration::from_secs(1)).unwrap(),
        ServiceEvent::Recovered { .. }
    ));
    assert!(!service.is_degraded());
}

#[test]
fn fallback_prices_stay_near_base() {
    let (service, _provider) = service_with(Script::Fail, fast_config());

    let quote = service.get_quote("RELIANCE").unwrap();

    assert!(quote.current_price >= 2450.0 * 0.98 && quote.current_price <= 2450.0 * 1.02);
    assert!((-2.0..=2.0).contains(&quote.change_percent));
    assert_eq!(quote.exchange, "NSE");
}

#[test]
fn purge_and_clear_manage_cache_size() {
    let config = ServiceConfig {
        cache_ttl_ms: 80,
        ..fast_config()
    };
    let (service, _provider) = service_with(Script::AllOk, config);

    service.get_multiple_quotes(&["TCS", "INFY"]);
    assert_eq!(service.cache_len(), 2);

    thread::sleep(Duration::from_millis(120));
    assert_eq!(service.purge_expired(), 2);
    assert_eq!(service.cache_len(), 0);

    service.get_quote("TCS");
    service.clear_cache();
    assert_eq!(service.cache_len(), 0);
}

#[test]
fn trending_quotes_cover_curated_list() {
    let (service, provider) = service_with(Script::AllOk, fast_config());

    let quotes = service.trending_quotes();

    assert_eq!(quotes.len(), service.trending_symbols().len());
    assert_eq!(provider.calls(), 1);
}
