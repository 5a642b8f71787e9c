use thiserror::Error;
use url::Url;

use super::models::{DownloadPayload, ProfilePayload};
use crate::download::DownloadRequest;
use crate::platform::MediaFormat;
use crate::profile::is_valid_username;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestValidationError {
    #[error("URL is required")]
    MissingUrl,
    #[error("Invalid URL format")]
    InvalidUrl,
    #[error("Unsupported format '{0}', expected mp4 or mp3")]
    UnsupportedFormat(String),
    #[error("Username is required")]
    MissingUsername,
    #[error("Invalid username format")]
    InvalidUsername,
}

/// Turn a decoded download body into an orchestrator request
pub fn validate_download(
    payload: DownloadPayload,
) -> Result<DownloadRequest, RequestValidationError> {
    let url = payload
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or(RequestValidationError::MissingUrl)?;

    Url::parse(&url).map_err(|_| RequestValidationError::InvalidUrl)?;

    let format = match payload.format.as_deref() {
        None => MediaFormat::default(),
        Some(raw) => {
            MediaFormat::parse(raw).ok_or_else(|| RequestValidationError::UnsupportedFormat(raw.to_string()))?
        }
    };

    Ok(DownloadRequest::new(url, format))
}

pub fn validate_profile(payload: ProfilePayload) -> Result<String, RequestValidationError> {
    let username = payload
        .username
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or(RequestValidationError::MissingUsername)?;

    if !is_valid_username(&username) {
        return Err(RequestValidationError::InvalidUsername);
    }
    Ok(username)
}
