use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};

use super::error::DownloadError;
use super::scrape::{ExtractionPattern, compile_static_regex, fetch_page, first_match};
use super::traits::Extractor;
use super::types::{MediaHint, ResolvedMedia, browser_headers};
use crate::fetch::HttpClient;
use crate::platform::{MediaFormat, Platform};

const REFERER: &str = "https://www.facebook.com/";

static SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(
        r"(?i)fb\.watch/[\w-]+|/videos?/|/watch/?\?(?:.*&)?v=|/reels?/|/share/[vr]/|/story\.php|/video\.php",
    )
});

// HD before SD; explicit <source> tags only when neither inline field exists.
static PATTERNS: LazyLock<Vec<ExtractionPattern>> = LazyLock::new(|| {
    vec![
        ExtractionPattern::new("hd_src", r#""hd_src":"([^"]+)""#, MediaHint::Video),
        ExtractionPattern::new("sd_src", r#""sd_src":"([^"]+)""#, MediaHint::Video),
        ExtractionPattern::new(
            "source_with_quality",
            r#"<source[^>]+src="([^"]*(?:mp4|webm))"[^>]*quality="[^"]*""#,
            MediaHint::Video,
        ),
        ExtractionPattern::new(
            "source",
            r#"<source[^>]+src="([^"]*(?:mp4|webm))""#,
            MediaHint::Video,
        ),
    ]
});

/// Facebook videos (`facebook.com` watch/video/reel pages and `fb.watch` links)
#[derive(Debug, Clone)]
pub struct FacebookExtractor {
    http: Arc<HttpClient>,
}

impl FacebookExtractor {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Extractor for FacebookExtractor {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    async fn extract(
        &self,
        url: &str,
        _format: MediaFormat,
    ) -> Result<ResolvedMedia, DownloadError> {
        if !SHAPE_RE.is_match(url) {
            return Err(DownloadError::malformed(
                Platform::Facebook,
                "expected a video, watch, reel or fb.watch link",
            ));
        }

        let headers = browser_headers(REFERER);
        let body = fetch_page(&self.http, Platform::Facebook, url, &headers).await?;

        let found = first_match(&PATTERNS, &body, url).ok_or_else(|| {
            DownloadError::no_media(
                Platform::Facebook,
                "Unable to extract video URL from Facebook",
            )
        })?;

        Ok(ResolvedMedia::new(Platform::Facebook, found.url, found.hint).with_headers(headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape() {
        assert!(SHAPE_RE.is_match("https://fb.watch/abcDEF12/"));
        assert!(SHAPE_RE.is_match("https://www.facebook.com/watch/?v=1234567890"));
        assert!(SHAPE_RE.is_match("https://www.facebook.com/watch?v=1234567890"));
        assert!(SHAPE_RE.is_match("https://www.facebook.com/page/videos/1234567890/"));
        assert!(SHAPE_RE.is_match("https://www.facebook.com/reel/1234567890"));
        assert!(SHAPE_RE.is_match("https://www.facebook.com/share/v/1AbCd/"));
        assert!(!SHAPE_RE.is_match("https://www.facebook.com/somebody"));
    }

    #[test]
    fn test_source_tag_fallback() {
        let body = r#"<video><source src="https://video.fbcdn.net/v/clip.mp4" type="video/mp4"></video>"#;
        let found = first_match(&PATTERNS, body, "https://fb.watch/x").unwrap();
        assert_eq!(found.pattern, "source");
        assert_eq!(found.url.as_str(), "https://video.fbcdn.net/v/clip.mp4");
    }

    #[test]
    fn test_quality_source_before_plain_source() {
        let body = r#"<source src="https://cdn/a.webm" quality="hd">"#;
        let found = first_match(&PATTERNS, body, "https://fb.watch/x").unwrap();
        assert_eq!(found.pattern, "source_with_quality");
    }
}
