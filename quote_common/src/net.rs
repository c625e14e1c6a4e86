//! Shared networking constants and helpers for reaching the quote proxy.

/// Name of the backend function that proxies the market-data provider.
pub const QUOTE_FUNCTION: &str = "stock-quotes";
/// Path prefix under which backend functions are exposed.
pub const FUNCTIONS_PATH: &str = "functions/v1";
/// Default HTTP timeout for a single proxy call, in milliseconds.
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

/// Helper to build the proxy URL for `function` on `base` like "base/functions/v1/function".
pub fn function_url(base: &str, function: &str) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        FUNCTIONS_PATH,
        function.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_url_joins_without_double_slashes() {
        assert_eq!(
            function_url("https://example.test/", QUOTE_FUNCTION),
            "https://example.test/functions/v1/stock-quotes"
        );
        assert_eq!(
            function_url("http://localhost:54321", "/quotes"),
            "http://localhost:54321/functions/v1/quotes"
        );
    }
}
