use crate::fetch::{DEFAULT_USER_AGENT, HttpConfig};
use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub youtube: YoutubeConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Largest accepted JSON request body
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: ByteSize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_max_payload_bytes() -> ByteSize {
    ByteSize::kib(64)
}

/// Outbound HTTP settings shared by every extractor and the relay
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSettings {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,
    #[serde(default = "default_media_timeout_secs")]
    pub media_timeout_secs: u64,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Optional outbound proxy, e.g. `http://proxy:3128`
    #[serde(default)]
    pub proxy: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout_secs(),
            page_timeout_secs: default_page_timeout_secs(),
            media_timeout_secs: default_media_timeout_secs(),
            max_redirects: default_max_redirects(),
            proxy: None,
        }
    }
}

impl HttpSettings {
    pub fn to_http_config(&self) -> HttpConfig {
        HttpConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            page_timeout: Duration::from_secs(self.page_timeout_secs),
            media_timeout: Duration::from_secs(self.media_timeout_secs),
            max_redirects: self.max_redirects,
            user_agent: self.user_agent.clone(),
            proxy: self.proxy.clone(),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_page_timeout_secs() -> u64 {
    10
}

fn default_media_timeout_secs() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct YoutubeConfig {
    /// Origin the watch pages are requested from
    #[serde(default = "default_youtube_base_url")]
    pub base_url: String,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            base_url: default_youtube_base_url(),
        }
    }
}

fn default_youtube_base_url() -> String {
    crate::extract::youtube::DEFAULT_BASE_URL.to_string()
}

/// Instagram profile provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileConfig {
    #[serde(default = "default_profile_base_url")]
    pub base_url: String,
    #[serde(default = "default_profile_api_host")]
    pub api_host: String,
    /// Provider key (loaded from environment, not from config file)
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            base_url: default_profile_base_url(),
            api_host: default_profile_api_host(),
            api_key: None,
        }
    }
}

fn default_profile_base_url() -> String {
    "https://instagram-scraper-api2.p.rapidapi.com/".to_string()
}

fn default_profile_api_host() -> String {
    "instagram-scraper-api2.p.rapidapi.com".to_string()
}
