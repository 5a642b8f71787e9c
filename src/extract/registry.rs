use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use super::facebook::FacebookExtractor;
use super::instagram::InstagramExtractor;
use super::pinterest::PinterestExtractor;
use super::tiktok::TiktokExtractor;
use super::traits::Extractor;
use super::youtube::YoutubeExtractor;
use crate::fetch::HttpClient;
use crate::platform::Platform;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no extractor registered for platform: {0}")]
    NotFound(Platform),
}

/// Registry mapping platforms to extraction strategies
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: BTreeMap<Platform, Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: BTreeMap::new(),
        }
    }

    /// Register an extractor under its own platform, replacing any previous one
    pub fn register(&mut self, extractor: Arc<dyn Extractor>) {
        self.extractors.insert(extractor.platform(), extractor);
    }

    pub fn get(&self, platform: Platform) -> Result<Arc<dyn Extractor>, RegistryError> {
        self.extractors
            .get(&platform)
            .cloned()
            .ok_or(RegistryError::NotFound(platform))
    }

    pub fn has_extractor(&self, platform: Platform) -> bool {
        self.extractors.contains_key(&platform)
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.extractors.keys().copied().collect()
    }

    /// Registry with the built-in extractor for every platform
    pub fn with_defaults(http: Arc<HttpClient>, youtube_base_url: Url) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(YoutubeExtractor::new(http.clone(), youtube_base_url)));
        registry.register(Arc::new(TiktokExtractor::new(http.clone())));
        registry.register(Arc::new(InstagramExtractor::new(http.clone())));
        registry.register(Arc::new(FacebookExtractor::new(http.clone())));
        registry.register(Arc::new(PinterestExtractor::new(http)));
        registry
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("platforms", &self.platforms())
            .finish()
    }
}
