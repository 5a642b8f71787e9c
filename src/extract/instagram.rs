use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use tracing::debug;

use super::error::DownloadError;
use super::scrape::{
    ExtractionPattern, absolutize, compile_static_regex, fetch_page, first_match,
};
use super::traits::Extractor;
use super::types::{MediaHint, ResolvedMedia, browser_headers};
use crate::fetch::HttpClient;
use crate::platform::{MediaFormat, Platform};

static SHORTCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?:/p/|/reel/|/tv/)([A-Za-z0-9_-]+)"));

static INLINE_PATTERNS: LazyLock<Vec<ExtractionPattern>> = LazyLock::new(|| {
    vec![
        ExtractionPattern::new("video_url", r#""video_url":"([^"]+)""#, MediaHint::Video),
        ExtractionPattern::new("src", r#""src":"([^"]+(?:mp4|mov))""#, MediaHint::Video),
        ExtractionPattern::new("playableUrl", r#""playableUrl":"([^"]+)""#, MediaHint::Video),
    ]
});

// Last resort: any "url" field mentioning mp4.
static MP4_FALLBACK: LazyLock<Vec<ExtractionPattern>> = LazyLock::new(|| {
    vec![ExtractionPattern::new(
        "url_mp4",
        r#""url":"([^"]*mp4[^"]*)""#,
        MediaHint::Video,
    )]
});

static LD_JSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r#"(?is)<script[^>]*type="application/ld\+json"[^>]*>(.*?)</script>"#)
});

/// Instagram posts, reels and IGTV
#[derive(Debug, Clone)]
pub struct InstagramExtractor {
    http: Arc<HttpClient>,
}

impl InstagramExtractor {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Shortcode of a post/reel/tv URL, taken from the path only
    pub fn shortcode(url: &str) -> Option<String> {
        let parsed = url::Url::parse(url).ok()?;
        SHORTCODE_RE
            .captures(parsed.path())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

#[async_trait]
impl Extractor for InstagramExtractor {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn extract(
        &self,
        url: &str,
        _format: MediaFormat,
    ) -> Result<ResolvedMedia, DownloadError> {
        let Some(shortcode) = Self::shortcode(url) else {
            return Err(DownloadError::malformed(
                Platform::Instagram,
                "expected a /p/, /reel/ or /tv/ link",
            ));
        };
        debug!(%shortcode, "Resolving Instagram media");

        let mut headers = browser_headers(url);
        headers.push(("X-Requested-With".to_string(), "XMLHttpRequest".to_string()));

        let body = fetch_page(&self.http, Platform::Instagram, url, &headers).await?;

        let resolved = first_match(&INLINE_PATTERNS, &body, url)
            .map(|found| found.url)
            .or_else(|| structured_video_url(&body, url))
            .or_else(|| first_match(&MP4_FALLBACK, &body, url).map(|found| found.url))
            .ok_or_else(|| {
                DownloadError::no_media(
                    Platform::Instagram,
                    "Unable to extract download URL from Instagram",
                )
            })?;

        Ok(ResolvedMedia::new(Platform::Instagram, resolved, MediaHint::Video)
            .with_headers(headers))
    }
}

/// Video URL from embedded JSON-LD metadata, if any block declares one
fn structured_video_url(body: &str, page_url: &str) -> Option<url::Url> {
    LD_JSON_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| serde_json::from_str::<Value>(m.as_str().trim()).ok())
        .find_map(|doc| find_video_content_url(&doc))
        .and_then(|candidate| absolutize(page_url, &candidate))
        .inspect(|_| debug!(pattern = "ld_json", "Extraction pattern matched"))
}

fn find_video_content_url(value: &Value) -> Option<String> {
    lookup_content_url(value, false)
}

/// Depth-first search for `contentUrl` on a video object. Anything held under
/// a `video` key counts as one, typed or not.
fn lookup_content_url(value: &Value, under_video: bool) -> Option<String> {
    match value {
        Value::Object(map) => {
            if under_video || declares_video_object(map.get("@type")) {
                if let Some(url) = map.get("contentUrl").and_then(Value::as_str) {
                    return Some(url.to_string());
                }
            }
            map.iter()
                .find_map(|(key, child)| lookup_content_url(child, key == "video"))
        }
        Value::Array(items) => items
            .iter()
            .find_map(|item| lookup_content_url(item, under_video)),
        _ => None,
    }
}

/// `@type` may be a single name or a list of names
fn declares_video_object(type_field: Option<&Value>) -> bool {
    let is_video = |t: &Value| {
        t.as_str()
            .is_some_and(|name| name.eq_ignore_ascii_case("VideoObject"))
    };
    match type_field {
        Some(Value::Array(names)) => names.iter().any(is_video),
        Some(other) => is_video(other),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcode() {
        assert_eq!(
            InstagramExtractor::shortcode("https://www.instagram.com/p/CxYz_12-a/"),
            Some("CxYz_12-a".to_string())
        );
        assert_eq!(
            InstagramExtractor::shortcode("https://instagram.com/reel/ABC"),
            Some("ABC".to_string())
        );
        assert_eq!(InstagramExtractor::shortcode("https://instagram.com/someone/"), None);
    }

    #[test]
    fn test_shortcode_ignores_query_string() {
        assert_eq!(
            InstagramExtractor::shortcode("https://instagram.com/someone/?next=/p/ABC123/"),
            None
        );
        assert_eq!(InstagramExtractor::shortcode("not a url /p/ABC123"), None);
    }

    #[test]
    fn test_structured_metadata() {
        let body = r#"<html><script type="application/ld+json">
            {"@context":"https://schema.org","@type":"SocialMediaPosting",
             "video":[{"@type":"VideoObject","contentUrl":"https://scontent.cdninstagram.com/v/clip.mp4"}]}
        </script></html>"#;
        let url = structured_video_url(body, "https://instagram.com/p/X").unwrap();
        assert_eq!(url.as_str(), "https://scontent.cdninstagram.com/v/clip.mp4");
    }

    #[test]
    fn test_structured_metadata_untyped_video() {
        let body = r#"<script type="application/ld+json">
            {"@type":"SocialMediaPosting","video":{"contentUrl":"https://cdn.example/x.mp4"}}
        </script>"#;
        let url = structured_video_url(body, "https://instagram.com/p/X").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example/x.mp4");
    }

    #[test]
    fn test_structured_metadata_type_list() {
        let body = r#"<script type="application/ld+json">
            {"@type":["VideoObject"],"contentUrl":"https://cdn.example/y.mp4"}
        </script>"#;
        let url = structured_video_url(body, "https://instagram.com/p/X").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example/y.mp4");
    }

    #[test]
    fn test_structured_metadata_without_video() {
        let body = r#"<script type="application/ld+json">{"@type":"ImageObject","contentUrl":"https://x/a.jpg"}</script>"#;
        assert!(structured_video_url(body, "https://instagram.com/p/X").is_none());
    }

    #[test]
    fn test_mp4_fallback() {
        let body = r#"{"url":"https:\/\/scontent\/v\/abc.mp4?efg=1"}"#;
        let found = first_match(&MP4_FALLBACK, body, "https://instagram.com/p/X").unwrap();
        assert_eq!(found.url.as_str(), "https://scontent/v/abc.mp4?efg=1");
        assert!(first_match(&INLINE_PATTERNS, body, "https://instagram.com/p/X").is_none());
    }
}
