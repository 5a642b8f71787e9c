//! URL classification into supported source platforms.
//!
//! Classification is a case-insensitive substring test against a fixed,
//! priority-ordered table of host fragments. The first entry that matches
//! wins; a URL matching nothing is simply unrecognized, not an error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source platform a media URL belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Tiktok,
    Instagram,
    Facebook,
    Pinterest,
}

/// Host fragments in match priority order.
const HOST_TABLE: &[(&str, Platform)] = &[
    ("youtube.com", Platform::Youtube),
    ("youtu.be", Platform::Youtube),
    ("tiktok.com", Platform::Tiktok),
    ("instagram.com", Platform::Instagram),
    ("facebook.com", Platform::Facebook),
    ("fb.watch", Platform::Facebook),
    ("pinterest.com", Platform::Pinterest),
];

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Youtube,
        Platform::Tiktok,
        Platform::Instagram,
        Platform::Facebook,
        Platform::Pinterest,
    ];

    /// Lowercase tag used in filenames, logs and config keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Pinterest => "pinterest",
        }
    }

    /// Human-facing name used in error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Youtube => "YouTube",
            Platform::Tiktok => "TikTok",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::Pinterest => "Pinterest",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a URL. Returns `None` when no platform fragment is present.
pub fn classify(url: &str) -> Option<Platform> {
    let lower = url.to_lowercase();
    HOST_TABLE
        .iter()
        .find(|(fragment, _)| lower.contains(fragment))
        .map(|(_, platform)| *platform)
}

/// Output format requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MediaFormat {
    #[default]
    #[serde(rename = "mp4")]
    Video,
    #[serde(rename = "mp3")]
    Audio,
}

impl MediaFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFormat::Video => "mp4",
            MediaFormat::Audio => "mp3",
        }
    }

    /// Parse the wire value (`mp4` / `mp3`)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mp4" => Some(MediaFormat::Video),
            "mp3" => Some(MediaFormat::Audio),
            _ => None,
        }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_platforms() {
        assert_eq!(classify("https://youtu.be/abc123"), Some(Platform::Youtube));
        assert_eq!(
            classify("https://www.tiktok.com/@u/video/123"),
            Some(Platform::Tiktok)
        );
        assert_eq!(
            classify("https://instagram.com/p/XYZ"),
            Some(Platform::Instagram)
        );
        assert_eq!(classify("https://fb.watch/abc"), Some(Platform::Facebook));
        assert_eq!(
            classify("https://pinterest.com/pin/123456789/"),
            Some(Platform::Pinterest)
        );
        assert_eq!(classify("https://example.com"), None);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(
            classify("HTTPS://WWW.YOUTUBE.COM/watch?v=dQw4w9WgXcQ"),
            Some(Platform::Youtube)
        );
        assert_eq!(
            classify("https://m.FaceBook.com/watch?v=1"),
            Some(Platform::Facebook)
        );
    }

    #[test]
    fn test_classify_is_total_and_deterministic() {
        let inputs = ["", "   ", "not a url", "\u{0}\u{1}", "ftp://tiktok.com", "💥"];
        for input in inputs {
            assert_eq!(classify(input), classify(input));
        }
        assert_eq!(classify(""), None);
        assert_eq!(classify("ftp://tiktok.com"), Some(Platform::Tiktok));
    }

    #[test]
    fn test_earliest_entry_wins() {
        // Both fragments present: youtube is registered first.
        assert_eq!(
            classify("https://youtube.com/redirect?q=https://tiktok.com/x"),
            Some(Platform::Youtube)
        );
    }

    #[test]
    fn test_media_format_wire_values() {
        assert_eq!(MediaFormat::parse("mp4"), Some(MediaFormat::Video));
        assert_eq!(MediaFormat::parse(" MP3 "), Some(MediaFormat::Audio));
        assert_eq!(MediaFormat::parse("wav"), None);
        assert_eq!(MediaFormat::default(), MediaFormat::Video);

        let parsed: MediaFormat = serde_json::from_str("\"mp3\"").unwrap();
        assert_eq!(parsed, MediaFormat::Audio);
    }
}
