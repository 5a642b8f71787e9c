//! Configuration management for mediagrab
//!
//! Settings are layered, highest priority last:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables
//!
//! # Usage
//!
//! ```no_run
//! use mediagrab::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Any key can be overridden with `MEDIAGRAB__<section>__<key>`:
//! - `MEDIAGRAB__SERVER__BIND_ADDR=127.0.0.1:9000`
//! - `MEDIAGRAB__HTTP__MEDIA_TIMEOUT_SECS=60`
//! - `MEDIAGRAB__SERVER__MAX_PAYLOAD_BYTES=128KB`
//!
//! The profile provider key is read from `RAPIDAPI_KEY` only.
//!
//! # Configuration File
//!
//! Loaded from `config/mediagrab.toml` unless `MEDIAGRAB_CONFIG` points elsewhere.
//! A missing file is not an error.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{Config, HttpSettings, ProfileConfig, ServerConfig, YoutubeConfig};
pub use validation::{MAX_PAYLOAD_LIMIT, ValidationError};

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment) and validate it
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Secrets are not read; useful for tests.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Parsed YouTube origin. Validation guarantees it parses.
    pub fn youtube_base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.youtube.base_url).map_err(|_| {
            ConfigError::ValidationError(ValidationError::InvalidUrl {
                field: "youtube.base_url",
                value: self.youtube.base_url.clone(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_full_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("mediagrab.toml");
        fs::write(
            &config_path,
            r#"
[server]
bind_addr = "0.0.0.0:3000"
max_payload_bytes = "16KB"

[http]
user_agent = "test-agent/1.0"
connect_timeout_secs = 3
page_timeout_secs = 4
media_timeout_secs = 60
max_redirects = 5

[youtube]
base_url = "https://www.youtube.com"

[profile]
base_url = "https://profiles.example.com/"
api_host = "profiles.example.com"
            "#,
        )
        .unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.server.bind_addr.port(), 3000);
        assert_eq!(config.server.max_payload_bytes, ByteSize::kib(16));

        let http = config.http.to_http_config();
        assert_eq!(http.user_agent, "test-agent/1.0");
        assert_eq!(http.page_timeout.as_secs(), 4);
        assert_eq!(http.media_timeout.as_secs(), 60);
        assert_eq!(http.max_redirects, 5);

        assert_eq!(config.profile.api_host, "profiles.example.com");
        assert_eq!(
            config.youtube_base_url().unwrap().as_str(),
            "https://www.youtube.com/"
        );
    }

    #[test]
    fn test_validation_runs_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("mediagrab.toml");
        fs::write(&config_path, "[server]\nmax_payload_bytes = \"8MB\"\n").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError(
                ValidationError::PayloadLimitTooLarge { .. }
            ))
        ));
    }

    #[test]
    fn test_malformed_toml_is_load_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("mediagrab.toml");
        fs::write(&config_path, "[server\nbind_addr = ").unwrap();

        assert!(matches!(
            Config::load_from_path(config_path),
            Err(ConfigError::LoadError(_))
        ));
    }
}
