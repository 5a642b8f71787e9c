use async_trait::async_trait;

use super::error::DownloadError;
use super::types::ResolvedMedia;
use crate::platform::{MediaFormat, Platform};

/// Platform-specific media extraction strategy
///
/// An extractor validates the URL shape for its platform, fetches whatever
/// page or metadata it needs, and resolves a directly fetchable media URL.
/// It never reads the media body itself; that is the relay's job.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Platform this extractor serves
    fn platform(&self) -> Platform;

    /// Resolve `url` to a direct media resource
    async fn extract(
        &self,
        url: &str,
        format: MediaFormat,
    ) -> Result<ResolvedMedia, DownloadError>;
}
