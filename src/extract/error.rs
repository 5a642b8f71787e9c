use serde::Serialize;
use thiserror::Error;

use crate::fetch::FetchError;
use crate::platform::Platform;

/// Failure taxonomy surfaced by the download pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedUrl,
    UnsupportedPlatform,
    FetchFailed,
    NoMediaFound,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MalformedUrl => "MALFORMED_URL",
            ErrorKind::UnsupportedPlatform => "UNSUPPORTED_PLATFORM",
            ErrorKind::FetchFailed => "FETCH_FAILED",
            ErrorKind::NoMediaFound => "NO_MEDIA_FOUND",
        }
    }
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Invalid {} URL format: {reason}", .platform.display_name())]
    MalformedUrl { platform: Platform, reason: String },

    #[error(
        "Unsupported platform. Please use YouTube, TikTok, Instagram, Facebook, or Pinterest URLs."
    )]
    UnsupportedPlatform,

    #[error("Failed to download {} media: {source}", .platform.display_name())]
    FetchFailed {
        platform: Platform,
        #[source]
        source: FetchError,
    },

    #[error("Failed to download {} media: {reason}", .platform.display_name())]
    NoMediaFound { platform: Platform, reason: String },
}

impl DownloadError {
    pub fn malformed(platform: Platform, reason: impl Into<String>) -> Self {
        DownloadError::MalformedUrl {
            platform,
            reason: reason.into(),
        }
    }

    pub fn fetch(platform: Platform, source: FetchError) -> Self {
        DownloadError::FetchFailed { platform, source }
    }

    pub fn no_media(platform: Platform, reason: impl Into<String>) -> Self {
        DownloadError::NoMediaFound {
            platform,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DownloadError::MalformedUrl { .. } => ErrorKind::MalformedUrl,
            DownloadError::UnsupportedPlatform => ErrorKind::UnsupportedPlatform,
            DownloadError::FetchFailed { .. } => ErrorKind::FetchFailed,
            DownloadError::NoMediaFound { .. } => ErrorKind::NoMediaFound,
        }
    }

    pub fn platform(&self) -> Option<Platform> {
        match self {
            DownloadError::MalformedUrl { platform, .. }
            | DownloadError::FetchFailed { platform, .. }
            | DownloadError::NoMediaFound { platform, .. } => Some(*platform),
            DownloadError::UnsupportedPlatform => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_messages_name_the_platform() {
        let err = DownloadError::malformed(Platform::Instagram, "missing shortcode");
        assert_eq!(
            err.to_string(),
            "Invalid Instagram URL format: missing shortcode"
        );

        let err = DownloadError::fetch(
            Platform::Tiktok,
            FetchError::Timeout(Duration::from_secs(10)),
        );
        assert!(err.to_string().starts_with("Failed to download TikTok media"));
        assert_eq!(err.kind(), ErrorKind::FetchFailed);
        assert_eq!(err.platform(), Some(Platform::Tiktok));
    }

    #[test]
    fn test_unsupported_has_no_platform() {
        let err = DownloadError::UnsupportedPlatform;
        assert_eq!(err.kind(), ErrorKind::UnsupportedPlatform);
        assert_eq!(err.kind().code(), "UNSUPPORTED_PLATFORM");
        assert!(err.platform().is_none());
    }
}
