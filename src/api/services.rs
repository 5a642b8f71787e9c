use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::{info, warn};

use super::{
    models::{DownloadPayload, HealthResponse, ProfilePayload, ProfileResponse},
    state::AppState,
    utils, validation,
};
use crate::api::error::ApiError;
use crate::download::truncate_url;

/// Media download endpoint (POST /api/download)
///
/// Classifies the URL, runs the matching platform extractor and relays the
/// upstream media body straight into the response. Nothing is buffered: the
/// client receives bytes as the upstream sends them.
///
/// ## Flow:
/// 1. Validate Content-Type and body size, decode `{ url, format? }`
/// 2. Reject a missing, blank or unparseable URL and unknown formats (400)
/// 3. Run the orchestrator; its failure kind selects the status
/// 4. Answer 200 with `Content-Disposition: attachment`, `Content-Type` and,
///    when upstream declared it, `Content-Length`
///
/// Dropping the response (client disconnect) drops the upstream stream.
pub async fn download(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, ApiError> {
    let payload: DownloadPayload = read_json(&state, &headers, body).await?;
    let request = validation::validate_download(payload)?;

    state.metrics.download_requested();

    let payload = match state.downloader.download(&request).await {
        Ok(payload) => payload,
        Err(err) => {
            state.metrics.download_failed();
            warn!(
                platform = err.platform().map(|p| p.as_str()).unwrap_or("unrecognized"),
                url = %truncate_url(&request.source_url),
                kind = err.kind().code(),
                error = %err,
                "Download failed"
            );
            return Err(err.into());
        }
    };

    state.metrics.download_succeeded();
    info!(
        filename = payload.filename(),
        content_type = payload.content_type(),
        "Streaming download"
    );

    let (filename, content_type, content_length, stream) = payload.into_parts();
    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, utils::content_disposition(&filename)?);
    if let Some(length) = content_length {
        response = response.header(header::CONTENT_LENGTH, length);
    }

    response
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}

/// Instagram profile endpoint (POST /api/instagram-profile)
///
/// Passthrough to the configured profile provider. Answers 503 when no
/// provider key was configured at startup.
pub async fn instagram_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Result<impl IntoResponse, ApiError> {
    let payload: ProfilePayload = read_json(&state, &headers, body).await?;
    let username = validation::validate_profile(payload)?;

    state.metrics.profile_lookup();

    let profile = state.profiles.lookup(&username).await.map_err(|err| {
        warn!(username, error = %err, "Profile lookup failed");
        err
    })?;

    Ok(Json(ProfileResponse {
        success: true,
        data: profile,
    }))
}

/// Health check endpoint (GET /health)
///
/// Reports the registered platforms and whether profile lookup is available.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let platforms = state
        .downloader
        .registry()
        .platforms()
        .into_iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let profile_status = if state.profiles.is_configured() {
        "configured"
    } else {
        "not_configured"
    };

    let components = BTreeMap::from([
        ("api".to_string(), "healthy".to_string()),
        ("platforms".to_string(), platforms),
        ("profile_provider".to_string(), profile_status.to_string()),
    ]);

    let response = HealthResponse {
        status: "healthy".to_string(),
        components,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Counter snapshot (GET /operators/metrics)
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}

/// Checks Content-Type, reads the body within the configured limit and decodes it
async fn read_json<T: DeserializeOwned>(
    state: &AppState,
    headers: &HeaderMap,
    body: Body,
) -> Result<T, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::InvalidPayload("missing Content-Type header".into()))?;
    utils::parse_content_type(content_type)?;

    let data = utils::read_body_limited(body, state.max_payload_bytes()).await?;

    Ok(serde_json::from_slice(&data)?)
}
