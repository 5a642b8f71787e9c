//! Download orchestration: classify, extract, relay

use std::sync::Arc;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::extract::{DownloadError, ExtractorRegistry};
use crate::fetch::{HttpClient, MediaPayload, relay};
use crate::platform::{MediaFormat, classify};

const LOGGED_URL_CHARS: usize = 80;

/// One inbound download call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub source_url: String,
    pub format: MediaFormat,
}

impl DownloadRequest {
    pub fn new(source_url: impl Into<String>, format: MediaFormat) -> Self {
        Self {
            source_url: source_url.into(),
            format,
        }
    }
}

/// Entry point of the download pipeline
///
/// Holds no per-request state; one instance serves any number of concurrent
/// calls.
#[derive(Debug, Clone)]
pub struct Downloader {
    registry: Arc<ExtractorRegistry>,
    http: Arc<HttpClient>,
}

impl Downloader {
    pub fn new(registry: ExtractorRegistry, http: Arc<HttpClient>) -> Self {
        Self {
            registry: Arc::new(registry),
            http,
        }
    }

    /// Default extractors over a shared client
    pub fn with_defaults(http: Arc<HttpClient>, youtube_base_url: Url) -> Self {
        let registry = ExtractorRegistry::with_defaults(http.clone(), youtube_base_url);
        Self::new(registry, http)
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// Run exactly one extractor for the request and relay its result
    #[tracing::instrument(
        skip(self, request),
        fields(
            request_id = %Uuid::now_v7(),
            url = %truncate_url(&request.source_url),
            format = %request.format,
            platform = tracing::field::Empty
        )
    )]
    pub async fn download(&self, request: &DownloadRequest) -> Result<MediaPayload, DownloadError> {
        let platform = classify(&request.source_url).ok_or(DownloadError::UnsupportedPlatform)?;
        tracing::Span::current().record("platform", platform.as_str());

        let extractor = self
            .registry
            .get(platform)
            .map_err(|_| DownloadError::UnsupportedPlatform)?;

        let media = extractor.extract(&request.source_url, request.format).await?;
        debug!(media_url = %truncate_url(media.url.as_str()), "Media resolved");

        let payload = relay(&self.http, media).await?;
        info!(
            filename = payload.filename(),
            content_type = payload.content_type(),
            "Download ready"
        );
        Ok(payload)
    }
}

/// Shorten a URL for log lines
pub fn truncate_url(url: &str) -> String {
    if url.chars().count() <= LOGGED_URL_CHARS {
        return url.to_string();
    }
    let head: String = url.chars().take(LOGGED_URL_CHARS).collect();
    format!("{head}…")
}
