//! HTTP fetch for the static extraction path.
//!
//! ### URL Canonicalization
//! - Trim whitespace, ensure scheme (default: `https`)
//! - Lowercase host, remove fragments
//! - Preserve query string
//!
//! ### Request Shape
//! - Browser-like `User-Agent` and `Accept` headers to reduce anti-bot rejection
//! - Bounded wall-clock timeout per request
//! - Max redirects: 5
//! - Max body bytes: 5MB (configurable)

pub mod url;

use bytes::Bytes;
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

pub use self::url::{UrlError, canonicalize, find_url};

use webground_core::{AppConfig, Error};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: desktop Chrome)
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let app = AppConfig::default();
        let timeout = app.timeout();
        Self { user_agent: app.user_agent, max_bytes: app.max_bytes, timeout, max_redirects: 5 }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The original URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchResponse {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Whether the Content-Type (if any) looks like a markup or text document.
    pub fn is_textual(&self) -> bool {
        match self.content_type.as_deref() {
            None => true,
            Some(ct) => {
                let ct = ct.to_ascii_lowercase();
                ct.starts_with("text/") || ct.contains("html") || ct.contains("xml")
            }
        }
    }
}

/// HTTP fetch client.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL, returning raw bytes and metadata.
    ///
    /// Non-success statuses, timeouts, and oversized bodies are errors.
    pub async fn fetch(&self, url_str: &str) -> Result<FetchResponse, Error> {
        let start = Instant::now();
        let url = canonicalize(url_str).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("fetched {} -> {} in {}ms ({} bytes)", url, final_url, fetch_ms, bytes.len());

        Ok(FetchResponse { url, final_url, status, content_type, bytes, fetch_ms })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::FetchTimeout(format!("no response within {}ms", self.config.timeout.as_millis()))
        } else {
            Error::HttpError(format!("network error: {}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(content_type: Option<&str>) -> FetchResponse {
        FetchResponse {
            url: Url::parse("https://example.com").unwrap(),
            final_url: Url::parse("https://example.com/redirected").unwrap(),
            status: StatusCode::OK,
            content_type: content_type.map(str::to_string),
            bytes: Bytes::from_static(b"<p>hi</p>"),
            fetch_ms: 100,
        }
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert!(config.user_agent.contains("Mozilla/5.0"));
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(20000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_config_from_app_config() {
        let app = AppConfig { timeout_ms: 1500, user_agent: "ua/1".into(), ..Default::default() };
        let config = FetchConfig::from(&app);
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.user_agent, "ua/1");
    }

    #[test]
    fn test_fetch_response_text() {
        let r = response(Some("text/html; charset=utf-8"));
        assert_eq!(r.text(), "<p>hi</p>");
        assert_eq!(r.final_url.as_str(), "https://example.com/redirected");
    }

    #[test]
    fn test_is_textual() {
        assert!(response(None).is_textual());
        assert!(response(Some("text/html")).is_textual());
        assert!(response(Some("application/xhtml+xml")).is_textual());
        assert!(!response(Some("application/pdf")).is_textual());
        assert!(!response(Some("image/png")).is_textual());
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let result = client.fetch("ftp://example.com/file").await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let config = FetchConfig { timeout: Duration::from_secs(2), ..Default::default() };
        let client = FetchClient::new(config).unwrap();
        let result = client.fetch("http://127.0.0.1:1/").await;
        assert!(matches!(result, Err(Error::HttpError(_)) | Err(Error::FetchTimeout(_))));
    }
}
