use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default time budget for one fetch, covering connect, headers and body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

const FEED_ACCEPT: &str =
    "application/rss+xml, application/xml;q=0.9, text/xml;q=0.8, */*;q=0.1";

/// Errors that can occur while retrieving a feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The feed URL could not be parsed or is not HTTP(S)
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// The whole request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// Checks that a feed URL parses and uses the http or https scheme.
///
/// # Examples
///
/// ```
/// use rss_items::feed::validate_feed_url;
///
/// assert!(validate_feed_url("https://example.com/rss.xml").is_ok());
/// assert!(validate_feed_url("file:///etc/passwd").is_err());
/// ```
pub fn validate_feed_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        "http" | "https" => Err(FetchError::InvalidUrl(format!("{url}: missing host"))),
        scheme => Err(FetchError::InvalidUrl(format!(
            "{url}: unsupported scheme {scheme} (only http/https allowed)"
        ))),
    }
}

/// Retrieves raw feed XML over HTTP.
///
/// One GET per call: there is no retry and no caching. A fetch that fails
/// simply returns its error; deciding what to show instead is up to the caller.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_bytes: usize,
}

impl FeedFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_TIMEOUT,
            max_bytes: MAX_FEED_SIZE,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Fetches the feed at `url` and returns its body.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] - not an http(s) URL
    /// - [`FetchError::Network`] - connection or TLS errors
    /// - [`FetchError::Timeout`] - the request and body read exceeded the timeout
    /// - [`FetchError::HttpStatus`] - non-2xx response
    /// - [`FetchError::ResponseTooLarge`] - body exceeded the size limit
    /// - [`FetchError::IncompleteResponse`] - body shorter than Content-Length
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = validate_feed_url(url)?;

        let bytes = tokio::time::timeout(self.timeout, self.fetch_unbounded(&url))
            .await
            .map_err(|_| FetchError::Timeout)??;

        tracing::debug!(url = %url, bytes = bytes.len(), "Fetched feed");
        Ok(bytes)
    }

    async fn fetch_unbounded(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .header(reqwest::header::ACCEPT, FEED_ACCEPT)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(url = %url, status = %response.status(), "Feed request failed");
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        read_limited_bytes(response, self.max_bytes).await
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    // EDGE-005: Interrupted transfers end early without a stream error
    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
