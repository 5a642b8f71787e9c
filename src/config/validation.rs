use super::models::{Config, HttpSettings, ProfileConfig};
use crate::humanize::ByteSize;
use thiserror::Error;
use url::Url;

/// Upper bound for `server.max_payload_bytes`; requests are two short strings
pub const MAX_PAYLOAD_LIMIT: ByteSize = ByteSize::mib(1);

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("max_payload_bytes ({actual}) exceeds limit of {limit}")]
    PayloadLimitTooLarge { actual: ByteSize, limit: ByteSize },

    #[error("max_payload_bytes must be positive")]
    PayloadLimitZero,

    #[error("Timeout must be positive: {field}")]
    ZeroTimeout { field: &'static str },

    #[error("Invalid URL for {field}: '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("Profile API key is set but blank")]
    BlankApiKey,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_server(config)?;
    validate_http(&config.http)?;
    validate_http_url("youtube.base_url", &config.youtube.base_url)?;
    validate_profile(&config.profile)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    let actual = config.server.max_payload_bytes;
    if actual.as_u64() == 0 {
        return Err(ValidationError::PayloadLimitZero);
    }
    if actual > MAX_PAYLOAD_LIMIT {
        return Err(ValidationError::PayloadLimitTooLarge {
            actual,
            limit: MAX_PAYLOAD_LIMIT,
        });
    }
    Ok(())
}

fn validate_http(http: &HttpSettings) -> Result<(), ValidationError> {
    for (field, value) in [
        ("http.connect_timeout_secs", http.connect_timeout_secs),
        ("http.page_timeout_secs", http.page_timeout_secs),
        ("http.media_timeout_secs", http.media_timeout_secs),
    ] {
        if value == 0 {
            return Err(ValidationError::ZeroTimeout { field });
        }
    }

    if let Some(proxy) = &http.proxy {
        validate_http_url("http.proxy", proxy)?;
    }
    Ok(())
}

fn validate_profile(profile: &ProfileConfig) -> Result<(), ValidationError> {
    validate_http_url("profile.base_url", &profile.base_url)?;
    if matches!(&profile.api_key, Some(key) if key.trim().is_empty()) {
        return Err(ValidationError::BlankApiKey);
    }
    Ok(())
}

fn validate_http_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}
