//! Stream relay: re-expose an upstream media body without buffering it

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures_util::{StreamExt, TryStreamExt, stream::BoxStream};
use reqwest::header::CONTENT_TYPE;
use std::fmt;
use std::io;
use tracing::debug;

use super::HttpClient;
use crate::extract::{DownloadError, MediaHint, ResolvedMedia};
use crate::platform::Platform;

/// Forward-only media body
pub type MediaStream = BoxStream<'static, io::Result<Bytes>>;

/// Relayed media, owned by exactly one consumer
///
/// The body can only be taken by value ([`MediaPayload::into_stream`] or
/// [`MediaPayload::into_parts`]), so it cannot be read twice.
pub struct MediaPayload {
    stream: MediaStream,
    filename: String,
    content_type: String,
    content_length: Option<u64>,
}

impl MediaPayload {
    pub fn new(
        stream: MediaStream,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content_length: Option<u64>,
    ) -> Self {
        Self {
            stream,
            filename: filename.into(),
            content_type: content_type.into(),
            content_length,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Upstream-declared length, when known
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    pub fn into_stream(self) -> MediaStream {
        self.stream
    }

    /// Split into `(filename, content_type, content_length, stream)`
    pub fn into_parts(self) -> (String, String, Option<u64>, MediaStream) {
        (self.filename, self.content_type, self.content_length, self.stream)
    }
}

impl fmt::Debug for MediaPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaPayload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Open the resolved media URL and hand back its body as a live stream
pub async fn relay(http: &HttpClient, media: ResolvedMedia) -> Result<MediaPayload, DownloadError> {
    let platform = media.platform;
    let response = http
        .open_stream(media.url.as_str(), &media.headers)
        .await
        .map_err(|e| DownloadError::fetch(platform, e))?;

    let upstream_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let content_type = resolve_content_type(upstream_type.as_deref(), media.hint);
    let filename = suggested_filename(
        platform,
        media.title.as_deref(),
        extension_for(&content_type),
        Utc::now(),
    );
    let content_length = response.content_length();

    debug!(
        %platform,
        filename,
        content_type,
        content_length,
        "Relaying media stream"
    );

    let stream = response.bytes_stream().map_err(io::Error::other).boxed();

    Ok(MediaPayload::new(stream, filename, content_type, content_length))
}

/// Upstream `Content-Type` when it names something concrete, otherwise the
/// hint's fallback
pub fn resolve_content_type(upstream: Option<&str>, hint: MediaHint) -> String {
    upstream
        .and_then(|raw| raw.parse::<mime::Mime>().ok())
        .filter(|m| m.essence_str() != mime::APPLICATION_OCTET_STREAM.essence_str())
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| hint.fallback_content_type().to_string())
}

/// File extension for a content type
pub fn extension_for(content_type: &str) -> &'static str {
    let Ok(parsed) = content_type.parse::<mime::Mime>() else {
        return "bin";
    };

    match (parsed.type_().as_str(), parsed.subtype().as_str()) {
        ("video", "mp4") => "mp4",
        ("video", "webm") => "webm",
        ("video", "quicktime") => "mov",
        ("video", _) => "mp4",
        ("image", "jpeg" | "jpg" | "pjpeg") => "jpg",
        ("image", "png") => "png",
        ("image", "gif") => "gif",
        ("image", "webp") => "webp",
        ("audio", "mpeg" | "mp3") => "mp3",
        ("audio", "mp4" | "m4a" | "x-m4a") => "m4a",
        ("audio", "webm") => "weba",
        ("audio", "ogg") => "ogg",
        _ => "bin",
    }
}

/// `<title>.<ext>` when a title is known, else `<platform>_<unix-millis>.<ext>`
pub fn suggested_filename(
    platform: Platform,
    title: Option<&str>,
    extension: &str,
    now: DateTime<Utc>,
) -> String {
    match title.filter(|t| !t.is_empty()) {
        Some(title) => format!("{}.{}", title, extension),
        None => format!("{}_{}.{}", platform.as_str(), now.timestamp_millis(), extension),
    }
}
