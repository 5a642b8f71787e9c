//! YouTube extraction through a typed watch-page client
//!
//! Unlike the scraping extractors, YouTube embeds a full player response
//! (`ytInitialPlayerResponse`) as JSON. The client decodes it into typed
//! structs and picks a stream the same way a downloader library would:
//! `highestaudio` over audio-only streams, or `highest` over streams
//! carrying both audio and video.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use tracing::debug;
use url::Url;

use super::error::DownloadError;
use super::scrape::{compile_static_regex, fetch_page};
use super::traits::Extractor;
use super::types::{MediaHint, ResolvedMedia, browser_headers};
use crate::fetch::HttpClient;
use crate::platform::{MediaFormat, Platform};

pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse";

static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"^[A-Za-z0-9_-]{11}$"));

const VALID_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "gaming.youtube.com",
    "youtu.be",
    "www.youtube-nocookie.com",
];

/// Validated 11-character video id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn parse(candidate: &str) -> Option<Self> {
        VIDEO_ID_RE
            .is_match(candidate)
            .then(|| VideoId(candidate.to_string()))
    }
}

/// Validate a YouTube URL and pull out its video id
pub fn validate_url(input: &str) -> Option<VideoId> {
    let url = Url::parse(input.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?.to_ascii_lowercase();
    if !VALID_HOSTS.contains(&host.as_str()) {
        return None;
    }

    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    if host == "youtu.be" {
        return segments.next().and_then(VideoId::parse);
    }

    if let Some((_, v)) = url.query_pairs().find(|(key, _)| key == "v") {
        return VideoId::parse(&v);
    }

    match (segments.next(), segments.next()) {
        (Some("shorts" | "embed" | "live" | "v"), Some(id)) => VideoId::parse(id),
        _ => None,
    }
}

/// Replace every non-alphanumeric character and lowercase the rest
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub playability_status: Option<PlayabilityStatus>,
    pub video_details: Option<VideoDetails>,
    pub streaming_data: Option<StreamingData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayabilityStatus {
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub video_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingData {
    #[serde(default)]
    pub formats: Vec<StreamFormat>,
    #[serde(default)]
    pub adaptive_formats: Vec<StreamFormat>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamFormat {
    pub itag: u32,
    /// Absent when the stream is signature-ciphered
    pub url: Option<String>,
    pub mime_type: String,
    #[serde(default)]
    pub bitrate: u64,
    pub height: Option<u32>,
    pub audio_quality: Option<String>,
}

impl StreamFormat {
    pub fn has_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }

    pub fn has_audio(&self) -> bool {
        self.mime_type.starts_with("audio/") || self.audio_quality.is_some()
    }
}

/// Which streams are eligible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFilter {
    AudioOnly,
    AudioAndVideo,
}

/// How to rank eligible streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Highest,
    HighestAudio,
}

/// Decoded watch-page metadata
#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub video_id: VideoId,
    pub title: String,
    pub formats: Vec<StreamFormat>,
}

impl VideoInfo {
    /// Best stream for `quality` among those passing `filter`
    pub fn choose_format(&self, quality: Quality, filter: StreamFilter) -> Option<&StreamFormat> {
        let eligible = self.formats.iter().filter(|f| f.url.is_some()).filter(|f| match filter {
            StreamFilter::AudioOnly => f.has_audio() && !f.has_video(),
            StreamFilter::AudioAndVideo => f.has_audio() && f.has_video(),
        });

        match quality {
            Quality::Highest => eligible.max_by_key(|f| (f.height.unwrap_or(0), f.bitrate)),
            Quality::HighestAudio => eligible.max_by_key(|f| f.bitrate),
        }
    }
}

/// Locate and decode the embedded player response
pub fn parse_player_response(body: &str) -> Option<PlayerResponse> {
    let marker = body.find(PLAYER_RESPONSE_MARKER)?;
    let after = &body[marker + PLAYER_RESPONSE_MARKER.len()..];
    let start = after.find('{')?;
    // Only the leading JSON value is decoded; trailing script text is ignored.
    serde_json::Deserializer::from_str(&after[start..])
        .into_iter::<PlayerResponse>()
        .next()?
        .ok()
}

/// Typed client over YouTube watch pages
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    http: Arc<HttpClient>,
    base_url: Url,
}

impl YoutubeClient {
    pub fn new(http: Arc<HttpClient>, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn watch_url(&self, id: &VideoId) -> String {
        let mut url = self.base_url.clone();
        url.set_path("/watch");
        url.set_query(Some(&format!("v={}", id.as_str())));
        url.to_string()
    }

    pub fn referer(&self) -> String {
        self.base_url.to_string()
    }

    pub async fn get_info(&self, id: &VideoId) -> Result<VideoInfo, DownloadError> {
        let watch_url = self.watch_url(id);
        let headers = browser_headers(&self.referer());
        let body = fetch_page(&self.http, Platform::Youtube, &watch_url, &headers).await?;

        let player = parse_player_response(&body).ok_or_else(|| {
            DownloadError::no_media(Platform::Youtube, "watch page has no player response")
        })?;

        if let Some(status) = &player.playability_status {
            if status.status != "OK" {
                return Err(DownloadError::no_media(
                    Platform::Youtube,
                    format!(
                        "video is not playable ({}): {}",
                        status.status,
                        status.reason.as_deref().unwrap_or("no reason given")
                    ),
                ));
            }
        }

        let title = player
            .video_details
            .as_ref()
            .and_then(|details| details.title.clone())
            .unwrap_or_else(|| id.as_str().to_string());

        let streaming = player.streaming_data.unwrap_or_default();
        let mut formats = streaming.formats;
        formats.extend(streaming.adaptive_formats);

        debug!(video_id = id.as_str(), formats = formats.len(), "Decoded player response");

        Ok(VideoInfo {
            video_id: id.clone(),
            title,
            formats,
        })
    }
}

/// YouTube extractor backed by [`YoutubeClient`]
#[derive(Debug, Clone)]
pub struct YoutubeExtractor {
    client: YoutubeClient,
}

impl YoutubeExtractor {
    pub fn new(http: Arc<HttpClient>, base_url: Url) -> Self {
        Self {
            client: YoutubeClient::new(http, base_url),
        }
    }
}

#[async_trait]
impl Extractor for YoutubeExtractor {
    fn platform(&self) -> Platform {
        Platform::Youtube
    }

    async fn extract(
        &self,
        url: &str,
        format: MediaFormat,
    ) -> Result<ResolvedMedia, DownloadError> {
        let id = validate_url(url)
            .ok_or_else(|| DownloadError::malformed(Platform::Youtube, "Invalid YouTube URL"))?;

        let info = self.client.get_info(&id).await?;

        let (quality, filter, hint) = match format {
            MediaFormat::Audio => (Quality::HighestAudio, StreamFilter::AudioOnly, MediaHint::Audio),
            MediaFormat::Video => (Quality::Highest, StreamFilter::AudioAndVideo, MediaHint::Video),
        };

        let chosen = info.choose_format(quality, filter).ok_or_else(|| {
            DownloadError::no_media(
                Platform::Youtube,
                format!("no directly downloadable {} stream", format),
            )
        })?;
        debug!(itag = chosen.itag, mime = %chosen.mime_type, "Selected YouTube stream");

        let stream_url = chosen
            .url
            .as_deref()
            .and_then(|u| Url::parse(u).ok())
            .ok_or_else(|| DownloadError::no_media(Platform::Youtube, "stream URL is invalid"))?;

        Ok(ResolvedMedia::new(Platform::Youtube, stream_url, hint)
            .with_title(sanitize_title(&info.title))
            .with_headers(browser_headers(&self.client.referer())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_variants() {
        let id = "dQw4w9WgXcQ";
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=42",
            "https://m.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://music.youtube.com/watch?v=dQw4w9WgXcQ",
        ] {
            assert_eq!(validate_url(url).as_ref().map(VideoId::as_str), Some(id), "{url}");
        }
    }

    #[test]
    fn test_validate_url_rejects() {
        assert!(validate_url("https://www.youtube.com/").is_none());
        assert!(validate_url("https://www.youtube.com/watch?v=short").is_none());
        assert!(validate_url("https://evil.com/watch?v=dQw4w9WgXcQ").is_none());
        assert!(validate_url("https://youtube.com.evil.com/watch?v=dQw4w9WgXcQ").is_none());
        assert!(validate_url("youtube.com/watch?v=dQw4w9WgXcQ").is_none());
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Never Gonna Give You Up!"), "never_gonna_give_you_up_");
        assert_eq!(sanitize_title("Ünïcode 2"), "_n_code_2");
    }

    fn sample_page() -> String {
        r#"<html><script>var ytInitialPlayerResponse = {
            "playabilityStatus": {"status": "OK"},
            "videoDetails": {"videoId": "dQw4w9WgXcQ", "title": "Test Video"},
            "streamingData": {
                "formats": [
                    {"itag": 18, "url": "https://rr.googlevideo.com/18", "mimeType": "video/mp4; codecs=\"avc1.42001E, mp4a.40.2\"", "bitrate": 500000, "height": 360, "audioQuality": "AUDIO_QUALITY_LOW"},
                    {"itag": 22, "signatureCipher": "s=abc", "mimeType": "video/mp4; codecs=\"avc1.64001F, mp4a.40.2\"", "bitrate": 1500000, "height": 720, "audioQuality": "AUDIO_QUALITY_MEDIUM"}
                ],
                "adaptiveFormats": [
                    {"itag": 137, "url": "https://rr.googlevideo.com/137", "mimeType": "video/mp4; codecs=\"avc1.640028\"", "bitrate": 4000000, "height": 1080},
                    {"itag": 140, "url": "https://rr.googlevideo.com/140", "mimeType": "audio/mp4; codecs=\"mp4a.40.2\"", "bitrate": 130000, "audioQuality": "AUDIO_QUALITY_MEDIUM"},
                    {"itag": 251, "url": "https://rr.googlevideo.com/251", "mimeType": "audio/webm; codecs=\"opus\"", "bitrate": 160000, "audioQuality": "AUDIO_QUALITY_MEDIUM"}
                ]
            }
        };var meta = {};</script></html>"#
            .to_string()
    }

    fn sample_info() -> VideoInfo {
        let player = parse_player_response(&sample_page()).unwrap();
        let streaming = player.streaming_data.unwrap();
        let mut formats = streaming.formats;
        formats.extend(streaming.adaptive_formats);
        VideoInfo {
            video_id: VideoId("dQw4w9WgXcQ".to_string()),
            title: player.video_details.unwrap().title.unwrap(),
            formats,
        }
    }

    #[test]
    fn test_parse_player_response() {
        let player = parse_player_response(&sample_page()).unwrap();
        assert_eq!(player.playability_status.unwrap().status, "OK");
        assert_eq!(player.video_details.unwrap().title.as_deref(), Some("Test Video"));
        assert_eq!(player.streaming_data.unwrap().adaptive_formats.len(), 3);
    }

    #[test]
    fn test_player_response_without_title() {
        let page = r#"var ytInitialPlayerResponse = {"videoDetails": {"videoId": "dQw4w9WgXcQ"}};"#;
        let player = parse_player_response(page).unwrap();
        assert!(player.video_details.unwrap().title.is_none());
    }

    #[test]
    fn test_missing_player_response() {
        assert!(parse_player_response("<html>nothing here</html>").is_none());
    }

    #[test]
    fn test_highest_combined_skips_ciphered() {
        let info = sample_info();
        let chosen = info
            .choose_format(Quality::Highest, StreamFilter::AudioAndVideo)
            .unwrap();
        // itag 22 is higher but ciphered, 137 has no audio
        assert_eq!(chosen.itag, 18);
    }

    #[test]
    fn test_highest_audio_only() {
        let info = sample_info();
        let chosen = info
            .choose_format(Quality::HighestAudio, StreamFilter::AudioOnly)
            .unwrap();
        assert_eq!(chosen.itag, 251);
    }

    #[test]
    fn test_watch_url_uses_base() {
        let http = Arc::new(HttpClient::new(Default::default()).unwrap());
        let client = YoutubeClient::new(http, Url::parse("http://127.0.0.1:9999").unwrap());
        let id = VideoId("dQw4w9WgXcQ".to_string());
        assert_eq!(client.watch_url(&id), "http://127.0.0.1:9999/watch?v=dQw4w9WgXcQ");
    }
}
