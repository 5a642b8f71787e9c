use std::sync::Arc;

use crate::config::Config;
use crate::download::Downloader;
use crate::fetch::HttpClient;
use crate::observability::Metrics;
use crate::profile::ProfileBackend;

pub type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    pub downloader: Arc<Downloader>,
    pub profiles: ProfileBackend,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, downloader: Downloader, profiles: ProfileBackend) -> Self {
        Self {
            config: Arc::new(config),
            downloader: Arc::new(downloader),
            profiles,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Wire the default extractors and profile backend from configuration
    pub fn from_config(config: Config) -> Result<Self, AnyError> {
        let http = Arc::new(HttpClient::new(config.http.to_http_config())?);
        let downloader = Downloader::with_defaults(http.clone(), config.youtube_base_url()?);
        let profiles = ProfileBackend::from_config(&config.profile, http);
        Ok(Self::new(config, downloader, profiles))
    }

    pub fn max_payload_bytes(&self) -> usize {
        self.config.server.max_payload_bytes.as_usize()
    }
}
