use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "MEDIAGRAB_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/mediagrab.toml";
const ENV_PREFIX: &str = "MEDIAGRAB";
const ENV_SEPARATOR: &str = "__";
const PROFILE_KEY_VAR: &str = "RAPIDAPI_KEY";

/// Load configuration with priority (lowest first):
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. `.env` file (via dotenvy)
/// 4. Process environment
pub fn load() -> Result<Config, ConfigError> {
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = load_from_sources(config_path)?;
    load_secrets(&mut config, |name| env::var(name).ok());

    Ok(config)
}

/// Secrets are never read from TOML files, only from the environment
fn load_secrets(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(key) = lookup(PROFILE_KEY_VAR) {
        config.profile.api_key = Some(key);
    }
}

/// Load configuration from a specific path and the environment
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::debug!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // MEDIAGRAB__HTTP__PAGE_TIMEOUT_SECS -> http.page_timeout_secs
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    builder.build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_from_sources(temp_dir.path().join("missing.toml")).unwrap();

        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.http.media_timeout_secs, 30);
        assert!(config.profile.api_key.is_none());
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("mediagrab.toml");
        fs::write(
            &config_path,
            r#"
[server]
bind_addr = "127.0.0.1:9000"
max_payload_bytes = "128KB"

[http]
page_timeout_secs = 5
proxy = "http://proxy:3128"

[youtube]
base_url = "http://127.0.0.1:1234"
            "#,
        )
        .unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.server.max_payload_bytes.as_u64(), 128 * 1024);
        assert_eq!(config.http.page_timeout_secs, 5);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.http.proxy.as_deref(), Some("http://proxy:3128"));
        assert_eq!(config.youtube.base_url, "http://127.0.0.1:1234");
    }

    #[test]
    fn test_api_key_ignored_in_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("mediagrab.toml");
        fs::write(&config_path, "[profile]\napi_key = \"leaked\"\n").unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert!(config.profile.api_key.is_none());
    }

    #[test]
    fn test_load_secrets() {
        let mut config = Config::default();
        load_secrets(&mut config, |name| {
            (name == PROFILE_KEY_VAR).then(|| "secret".to_string())
        });
        assert_eq!(config.profile.api_key.as_deref(), Some("secret"));
    }
}
