use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use quote_common::QuoteError;
use quote_service::{
    FallbackGenerator, HttpQuoteProvider, ProviderConfig, QuoteProvider, QuoteService,
};

mod common;
use common::fast_config;

/// Serve exactly one HTTP request with `status` and `body`; returns the request body.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/functions/v1/stock-quotes", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }
        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
        .unwrap();
        stream.flush().unwrap();
        String::from_utf8(request_body).unwrap()
    });

    (url, handle)
}

fn provider_for(url: String) -> HttpQuoteProvider {
    HttpQuoteProvider::new(ProviderConfig {
        endpoint: url,
        api_key: Some("test-key".to_string()),
        timeout_ms: 2_000,
    })
    .unwrap()
}

#[test]
fn posts_symbols_and_decodes_quotes() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"success":true,"data":[{"symbol":"TCS","companyName":"Tata Consultancy Services Ltd","currentPrice":3655.5,"changePercent":0.3,"volume":1000,"exchange":"NSE"}]}"#,
    );

    let quotes = provider_for(url)
        .fetch_quotes(&["TCS".to_string(), "INFY".to_string()])
        .unwrap();

    assert_eq!(server.join().unwrap(), r#"{"symbols":["TCS","INFY"]}"#);
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].current_price, 3655.5);
}

#[test]
fn error_envelope_is_a_provider_error() {
    let (url, server) = serve_once("200 OK", r#"{"success":false,"error":"rate limited"}"#);

    let result = provider_for(url).fetch_quotes(&["TCS".to_string()]);
    server.join().unwrap();

    assert!(matches!(result, Err(QuoteError::Provider(msg)) if msg == "rate limited"));
}

#[test]
fn non_success_status_is_an_http_error() {
    let (url, server) = serve_once("502 Bad Gateway", r#"{"success":false}"#);

    let result = provider_for(url).fetch_quotes(&["TCS".to_string()]);
    server.join().unwrap();

    assert!(matches!(result, Err(QuoteError::Http(_))));
}

#[test]
fn refused_connection_is_an_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/functions/v1/stock-quotes", listener.local_addr().unwrap());
    drop(listener);

    let result = provider_for(url).fetch_quotes(&["TCS".to_string()]);

    assert!(matches!(result, Err(QuoteError::Http(_))));
}

#[test]
fn malformed_body_falls_back_through_the_service() {
    let (url, server) = serve_once("200 OK", "<html>not json</html>");
    let service = QuoteService::with_fallback(
        fast_config(),
        Arc::new(provider_for(url)),
        FallbackGenerator::with_seed(2),
    )
    .unwrap();

    let quotes = service.get_multiple_quotes(&["TCS", "INFY"]);
    server.join().unwrap();

    assert_eq!(quotes.len(), 2);
    assert!(quotes.iter().all(|q| q.is_fallback));
}
