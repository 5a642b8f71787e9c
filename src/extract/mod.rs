//! Platform extraction strategies
//!
//! Turns a social-media page URL into a directly fetchable media URL.
//!
//! ## Key Components
//!
//! - [`Extractor`] - async trait each platform strategy implements
//! - [`ExtractorRegistry`] - platform → strategy lookup used by the orchestrator
//! - [`ExtractionPattern`] - named regex rule; platforms keep ordered lists of them
//! - [`YoutubeClient`] - typed watch-page client used instead of scraping
//! - [`DownloadError`] - failure taxonomy shared with the relay and orchestrator
//!
//! ## Example
//!
//! ```rust,ignore
//! use mediagrab::extract::ExtractorRegistry;
//! use mediagrab::platform::{MediaFormat, Platform};
//!
//! let registry = ExtractorRegistry::with_defaults(http, youtube_base);
//! let extractor = registry.get(Platform::Tiktok)?;
//! let media = extractor.extract(url, MediaFormat::Video).await?;
//! ```

mod error;
mod facebook;
mod instagram;
mod pinterest;
mod registry;
mod scrape;
mod tiktok;
mod traits;
mod types;
pub mod youtube;

pub use error::{DownloadError, ErrorKind};
pub use facebook::FacebookExtractor;
pub use instagram::InstagramExtractor;
pub use pinterest::PinterestExtractor;
pub use registry::{ExtractorRegistry, RegistryError};
pub use scrape::{ExtractionPattern, PatternMatch, absolutize, first_match, unescape_url};
pub use tiktok::TiktokExtractor;
pub use traits::Extractor;
pub use types::{MediaHint, ResolvedMedia, browser_headers};
pub use youtube::{YoutubeClient, YoutubeExtractor};
