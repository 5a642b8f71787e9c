use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use url::Url;

use super::error::DownloadError;
use super::scrape::{ExtractionPattern, compile_static_regex, fetch_page, first_match};
use super::traits::Extractor;
use super::types::{MediaHint, ResolvedMedia, browser_headers};
use crate::fetch::HttpClient;
use crate::platform::{MediaFormat, Platform};

const REFERER: &str = "https://www.pinterest.com/";

static PIN_ID_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"/(\d+)/?$"));

// Video patterns first; image patterns only when the pin carries no video.
static PATTERNS: LazyLock<Vec<ExtractionPattern>> = LazyLock::new(|| {
    vec![
        ExtractionPattern::new(
            "video_source",
            r#"<video[^>]*>[\s\S]*?<source[^>]+src="([^"]+)"[^>]*type="video"#,
            MediaHint::Video,
        ),
        ExtractionPattern::new("videoUrl", r#""videoUrl":"([^"]+)""#, MediaHint::Video),
        ExtractionPattern::new(
            "img",
            r#"<img[^>]+src="([^"]*\.(?:jpg|jpeg|png|gif))""#,
            MediaHint::Image,
        ),
        ExtractionPattern::new(
            "contentUrl",
            r#""contentUrl":"([^"]+\.(?:jpg|jpeg|png))""#,
            MediaHint::Image,
        ),
        ExtractionPattern::new(
            "images_736x",
            r#""images":\{[^}]*"736x":\{[^}]*"url":"([^"]+)""#,
            MediaHint::Image,
        ),
    ]
});

/// Pinterest pins, video or still image
///
/// The pattern's hint is advisory; the relay classifies the final resource
/// from the media response's `Content-Type`.
#[derive(Debug, Clone)]
pub struct PinterestExtractor {
    http: Arc<HttpClient>,
}

impl PinterestExtractor {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Numeric pin id at the end of the URL path
    pub fn pin_id(url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        PIN_ID_RE
            .captures(parsed.path())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

#[async_trait]
impl Extractor for PinterestExtractor {
    fn platform(&self) -> Platform {
        Platform::Pinterest
    }

    async fn extract(
        &self,
        url: &str,
        _format: MediaFormat,
    ) -> Result<ResolvedMedia, DownloadError> {
        if Self::pin_id(url).is_none() {
            return Err(DownloadError::malformed(
                Platform::Pinterest,
                "expected a /pin/<id>/ link",
            ));
        }

        let headers = browser_headers(REFERER);
        let body = fetch_page(&self.http, Platform::Pinterest, url, &headers).await?;

        let found = first_match(&PATTERNS, &body, url).ok_or_else(|| {
            DownloadError::no_media(
                Platform::Pinterest,
                "Unable to extract media URL from Pinterest",
            )
        })?;

        Ok(ResolvedMedia::new(Platform::Pinterest, found.url, found.hint).with_headers(headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_id() {
        assert_eq!(
            PinterestExtractor::pin_id("https://www.pinterest.com/pin/123456789/"),
            Some("123456789".to_string())
        );
        assert_eq!(
            PinterestExtractor::pin_id("https://pinterest.com/pin/987?utm_source=x"),
            Some("987".to_string())
        );
        assert_eq!(PinterestExtractor::pin_id("https://pinterest.com/someone/board/"), None);
        assert_eq!(PinterestExtractor::pin_id("pinterest.com/pin/1/"), None);
    }

    #[test]
    fn test_video_beats_image() {
        let body = r#"<img src="https://i.pinimg.com/736x/a.jpg">
            <video autoplay><source src="https://v.pinimg.com/videos/a.mp4" type="video/mp4"></video>"#;
        let found = first_match(&PATTERNS, body, "https://pinterest.com/pin/1/").unwrap();
        assert_eq!(found.pattern, "video_source");
        assert!(found.hint.is_video());
    }

    #[test]
    fn test_image_patterns() {
        let body = r#"{"images":{"736x":{"width":736,"url":"https:\/\/i.pinimg.com\/736x\/b.webp"}}}"#;
        let found = first_match(&PATTERNS, body, "https://pinterest.com/pin/1/").unwrap();
        assert_eq!(found.pattern, "images_736x");
        assert_eq!(found.hint, MediaHint::Image);
        assert_eq!(found.url.as_str(), "https://i.pinimg.com/736x/b.webp");
    }
}
