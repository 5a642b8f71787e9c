use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};

use super::error::DownloadError;
use super::scrape::{ExtractionPattern, compile_static_regex, fetch_page, first_match};
use super::traits::Extractor;
use super::types::{MediaHint, ResolvedMedia, browser_headers};
use crate::fetch::HttpClient;
use crate::platform::{MediaFormat, Platform};

const REFERER: &str = "https://www.tiktok.com/";

static SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?:vm|vt|v)\.tiktok\.com/(\w+)|/video/(\d+)"));

static PATTERNS: LazyLock<Vec<ExtractionPattern>> = LazyLock::new(|| {
    vec![
        ExtractionPattern::new("playAddr", r#""playAddr":"([^"]+)""#, MediaHint::Video),
        ExtractionPattern::new("downloadAddr", r#""downloadAddr":"([^"]+)""#, MediaHint::Video),
    ]
});

/// TikTok videos, via the player state embedded in the video page
#[derive(Debug, Clone)]
pub struct TiktokExtractor {
    http: Arc<HttpClient>,
}

impl TiktokExtractor {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Extractor for TiktokExtractor {
    fn platform(&self) -> Platform {
        Platform::Tiktok
    }

    async fn extract(
        &self,
        url: &str,
        _format: MediaFormat,
    ) -> Result<ResolvedMedia, DownloadError> {
        if !SHAPE_RE.is_match(url) {
            return Err(DownloadError::malformed(
                Platform::Tiktok,
                "expected a /video/<id> or short-link URL",
            ));
        }

        let headers = browser_headers(REFERER);
        let body = fetch_page(&self.http, Platform::Tiktok, url, &headers).await?;

        let found = first_match(&PATTERNS, &body, url).ok_or_else(|| {
            DownloadError::no_media(Platform::Tiktok, "Unable to extract download URL from TikTok")
        })?;

        Ok(ResolvedMedia::new(Platform::Tiktok, found.url, found.hint).with_headers(headers))
    }
}
