//! Request and response bodies of the HTTP API
//!
//! - `POST /api/download` accepts a [`DownloadPayload`] and answers with the
//!   media bytes as an attachment
//! - `POST /api/instagram-profile` accepts a [`ProfilePayload`] and answers
//!   with a [`ProfileResponse`]
//! - every failure answers with an [`ErrorResponse`]
//!
//! ```json
//! { "url": "https://www.tiktok.com/@user/video/7234567890123456789", "format": "mp4" }
//! ```
//!
//! Fields are optional at the serde level so that a missing `url` is reported
//! as a validation failure rather than a decode failure.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::profile::Profile;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadPayload {
    #[serde(default)]
    pub url: Option<String>,
    /// `"mp4"` (default) or `"mp3"`
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePayload {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub data: Profile,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: BTreeMap<String, String>,
    pub version: String,
}
