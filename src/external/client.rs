use std::time::Duration;

use reqwest::redirect::Policy;

/// Builds a `reqwest::Client` for one upstream.
///
/// Clients are built per component and injected rather than shared through a
/// global, so each upstream keeps its own timeout and redirect policy.
///
/// # Features
/// - **Compression**: gzip, deflate, brotli and zstd
/// - **Connection pooling**: idle connections kept for 90s
/// - **Security**: Rustls for TLS
///
/// # Example
/// ```ignore
/// let client = build_http_client(Duration::from_secs(10), 10)?;
/// let body = client.get("https://api.example.com").send().await?.text().await?;
/// ```
pub fn build_http_client(
    timeout: Duration,
    max_redirects: usize,
) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        // Timeouts
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(max_redirects))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // Compression
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}
