//! Outbound HTTP for page scraping and media relay

mod payload;

pub use payload::{MediaPayload, MediaStream, extension_for, relay, resolve_content_type, suggested_filename};

use reqwest::{Client, Proxy, Response};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Too many redirects")]
    TooManyRedirects,
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Browser-like UA; several platforms serve stripped pages to unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    /// Bound on a full page fetch (headers and body)
    pub page_timeout: Duration,
    /// Bound on receiving media response headers, and on each body read
    pub media_timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
    pub proxy: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            page_timeout: Duration::from_secs(10),
            media_timeout: Duration::from_secs(30),
            max_redirects: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
        }
    }
}

/// Shared outbound client. Cheap to share behind an `Arc`; holds no
/// per-request state.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    config: HttpConfig,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.media_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));

        if let Some(url) = config.proxy.as_deref() {
            let proxy = Proxy::all(url)
                .map_err(|e| FetchError::InvalidUrl(format!("Invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Fetch a page body as text, bounded by the page timeout
    pub async fn fetch_page(&self, url: &str, headers: &[(String, String)]) -> Result<String> {
        debug!(url, "Fetching page");

        let mut request = self.client.get(url).timeout(self.config.page_timeout);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_error(e, self.config.page_timeout))?;
        let response = check_status(response)?;

        let body = response
            .text()
            .await
            .map_err(|e| self.map_error(e, self.config.page_timeout))?;

        debug!(url, size = body.len(), "Page fetched");
        Ok(body)
    }

    /// Open a streaming GET. Returns once response headers arrive; the body
    /// is left unread for the caller.
    pub async fn open_stream(&self, url: &str, headers: &[(String, String)]) -> Result<Response> {
        debug!(url, "Opening media stream");

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let timeout = self.config.media_timeout;
        let response = tokio::time::timeout(timeout, request.send())
            .await
            .map_err(|_| FetchError::Timeout(timeout))?
            .map_err(|e| self.map_error(e, timeout))?;

        check_status(response)
    }

    fn map_error(&self, e: reqwest::Error, timeout: Duration) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(timeout)
        } else if e.is_redirect() {
            FetchError::TooManyRedirects
        } else if e.is_builder() {
            FetchError::InvalidUrl(e.to_string())
        } else {
            FetchError::RequestFailed(e.to_string())
        }
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_config_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.page_timeout, Duration::from_secs(10));
        assert_eq!(config.media_timeout, Duration::from_secs(30));
        assert_eq!(config.max_redirects, 10);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_invalid_proxy_rejected() {
        let config = HttpConfig {
            proxy: Some("::not a proxy::".to_string()),
            ..HttpConfig::default()
        };
        assert!(matches!(
            HttpClient::new(config),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_unparseable_url_is_an_error() {
        let client = HttpClient::new(HttpConfig::default()).unwrap();
        let result = client.fetch_page("not a url", &[]).await;
        assert!(result.is_err());
    }
}
