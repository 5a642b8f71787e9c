//! Named extraction patterns and page scraping helpers
//!
//! Each pattern is a standalone predicate-plus-extractor: a regex whose
//! first capture group is a candidate media URL. Platforms keep an ordered
//! list of them; the first pattern that yields an absolute URL wins.

use regex::Regex;
use tracing::debug;
use url::Url;

use super::error::DownloadError;
use super::types::MediaHint;
use crate::fetch::HttpClient;
use crate::platform::Platform;

pub(crate) fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

#[derive(Debug)]
pub struct ExtractionPattern {
    name: &'static str,
    regex: Regex,
    hint: MediaHint,
}

impl ExtractionPattern {
    pub fn new(name: &'static str, pattern: &str, hint: MediaHint) -> Self {
        Self {
            name,
            regex: compile_static_regex(pattern),
            hint,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn hint(&self) -> MediaHint {
        self.hint
    }

    /// First capture of this pattern in `body`, unescaped
    pub fn capture(&self, body: &str) -> Option<String> {
        self.regex
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| unescape_url(m.as_str()))
    }
}

/// A pattern hit resolved to an absolute URL
#[derive(Debug, Clone)]
pub struct PatternMatch {
    pub pattern: &'static str,
    pub url: Url,
    pub hint: MediaHint,
}

/// Undo JSON-in-HTML escaping commonly found around embedded media URLs
pub fn unescape_url(raw: &str) -> String {
    raw.replace("\\/", "/")
        .replace("\\u0026", "&")
        .replace("\\u002F", "/")
        .replace("&amp;", "&")
}

/// Resolve a candidate against the page it was found on. Only http(s)
/// results count.
pub fn absolutize(page_url: &str, candidate: &str) -> Option<Url> {
    let resolved = match Url::parse(candidate) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(page_url).ok()?.join(candidate).ok()?,
        Err(_) => return None,
    };

    matches!(resolved.scheme(), "http" | "https").then_some(resolved)
}

/// Try `patterns` in order against `body`
pub fn first_match(
    patterns: &[ExtractionPattern],
    body: &str,
    page_url: &str,
) -> Option<PatternMatch> {
    patterns.iter().find_map(|pattern| {
        let candidate = pattern.capture(body)?;
        let url = absolutize(page_url, &candidate)?;
        debug!(pattern = pattern.name(), "Extraction pattern matched");
        Some(PatternMatch {
            pattern: pattern.name(),
            url,
            hint: pattern.hint(),
        })
    })
}

/// Fetch a page, tagging transport failures with the platform
pub async fn fetch_page(
    http: &HttpClient,
    platform: Platform,
    url: &str,
    headers: &[(String, String)],
) -> Result<String, DownloadError> {
    http.fetch_page(url, headers)
        .await
        .map_err(|e| DownloadError::fetch(platform, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> Vec<ExtractionPattern> {
        vec![
            ExtractionPattern::new("hd", r#""hd":"([^"]+)""#, MediaHint::Video),
            ExtractionPattern::new("sd", r#""sd":"([^"]+)""#, MediaHint::Video),
        ]
    }

    #[test]
    fn test_unescape_url() {
        assert_eq!(
            unescape_url(r"https:\/\/cdn.example.com\/v.mp4?a=1&b=2"),
            "https://cdn.example.com/v.mp4?a=1&b=2"
        );
        assert_eq!(unescape_url("https://plain/x"), "https://plain/x");
    }

    #[test]
    fn test_first_match_prefers_earlier_pattern() {
        let body = r#"{"sd":"https://cdn/sd.mp4","hd":"https://cdn/hd.mp4"}"#;
        let found = first_match(&patterns(), body, "https://site/page").unwrap();
        assert_eq!(found.pattern, "hd");
        assert_eq!(found.url.as_str(), "https://cdn/hd.mp4");
    }

    #[test]
    fn test_first_match_falls_through() {
        let body = r#"{"sd":"https:\/\/cdn\/sd.mp4"}"#;
        let found = first_match(&patterns(), body, "https://site/page").unwrap();
        assert_eq!(found.pattern, "sd");
        assert_eq!(found.url.as_str(), "https://cdn/sd.mp4");
    }

    #[test]
    fn test_first_match_none() {
        assert!(first_match(&patterns(), "<html></html>", "https://site/page").is_none());
    }

    #[test]
    fn test_absolutize() {
        assert_eq!(
            absolutize("https://site.com/a/b", "/media/v.mp4").unwrap().as_str(),
            "https://site.com/media/v.mp4"
        );
        assert!(absolutize("https://site.com/", "javascript:alert(1)").is_none());
        assert!(absolutize("not a url", "relative.mp4").is_none());
    }

    #[test]
    fn test_non_http_candidate_skipped() {
        let body = r#"{"hd":"data:video/mp4;base64,AAAA","sd":"https://cdn/sd.mp4"}"#;
        let found = first_match(&patterns(), body, "https://site/page").unwrap();
        assert_eq!(found.pattern, "sd");
    }
}
