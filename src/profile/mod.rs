//! Instagram profile lookup
//!
//! A thin passthrough to an external data provider. Whether a provider is
//! available is decided once at startup: [`ProfileBackend::NotConfigured`]
//! is a normal state, not an error in the configuration.

mod rapidapi;

pub use rapidapi::RapidApiProvider;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use thiserror::Error;

use crate::config::ProfileConfig;
use crate::fetch::HttpClient;

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._]+$").unwrap_or_else(|e| panic!("invalid username regex: {e}"))
});

/// Number of recent posts included in a profile
pub const RECENT_POSTS: usize = 12;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("profile provider rate limit reached, try again later")]
    RateLimited,
    #[error("profile lookup is not configured")]
    NotConfigured,
    #[error("profile provider failed: {0}")]
    Upstream(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub username: String,
    pub full_name: String,
    pub bio: String,
    pub profile_pic_url: Option<String>,
    pub posts_count: u64,
    pub followers_count: u64,
    pub following_count: u64,
    pub is_verified: bool,
    pub posts: Vec<ProfilePost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePost {
    pub id: String,
    pub thumbnail: Option<String>,
    pub is_video: bool,
    pub likes: u64,
    pub comments: u64,
}

/// Source of profile records
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn lookup(&self, username: &str) -> Result<Profile, ProfileError>;
}

/// Profile lookup as configured at startup
#[derive(Clone)]
pub enum ProfileBackend {
    NotConfigured,
    Configured(Arc<dyn ProfileProvider>),
}

impl ProfileBackend {
    /// RapidAPI-backed when an API key is present, otherwise not configured
    pub fn from_config(config: &ProfileConfig, http: Arc<HttpClient>) -> Self {
        match config.api_key.as_deref() {
            Some(key) => ProfileBackend::Configured(Arc::new(RapidApiProvider::new(
                http,
                config.base_url.clone(),
                config.api_host.clone(),
                key.to_string(),
            ))),
            None => ProfileBackend::NotConfigured,
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, ProfileBackend::Configured(_))
    }

    pub async fn lookup(&self, username: &str) -> Result<Profile, ProfileError> {
        match self {
            ProfileBackend::NotConfigured => Err(ProfileError::NotConfigured),
            ProfileBackend::Configured(provider) => provider.lookup(username).await,
        }
    }
}

impl std::fmt::Debug for ProfileBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileBackend::NotConfigured => f.write_str("ProfileBackend::NotConfigured"),
            ProfileBackend::Configured(_) => f.write_str("ProfileBackend::Configured(..)"),
        }
    }
}

/// Instagram usernames: letters, digits, dots and underscores
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}
