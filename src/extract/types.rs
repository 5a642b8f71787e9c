use url::Url;

use crate::platform::Platform;

/// What the extraction pattern believes the resource is. Advisory only;
/// the relay prefers the upstream `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaHint {
    Video,
    Audio,
    Image,
}

impl MediaHint {
    pub fn is_video(&self) -> bool {
        matches!(self, MediaHint::Video)
    }

    /// Content type assumed when upstream does not declare a usable one
    pub fn fallback_content_type(&self) -> &'static str {
        match self {
            MediaHint::Video => "video/mp4",
            MediaHint::Audio => "audio/mpeg",
            MediaHint::Image => "image/jpeg",
        }
    }
}

/// Direct media resource located by an extractor
#[derive(Debug, Clone)]
pub struct ResolvedMedia {
    pub platform: Platform,
    pub url: Url,
    pub hint: MediaHint,
    /// Filesystem-safe title, when the platform exposes one
    pub title: Option<String>,
    /// Headers to replay on the media request
    pub headers: Vec<(String, String)>,
}

impl ResolvedMedia {
    pub fn new(platform: Platform, url: Url, hint: MediaHint) -> Self {
        Self {
            platform,
            url,
            hint,
            title: None,
            headers: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }
}

/// Headers a desktop browser sends when navigating from `referer`
pub fn browser_headers(referer: &str) -> Vec<(String, String)> {
    vec![
        ("Referer".to_string(), referer.to_string()),
        (
            "Accept".to_string(),
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
        ),
        ("Accept-Language".to_string(), "en-US,en;q=0.9".to_string()),
    ]
}
