//! Stateless helpers for request and response processing

use axum::{body::Body, http::HeaderValue};
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::api::error::ApiError;

/// Parses and validates a Content-Type header for application/json
///
/// Accepts `application/json`, optionally with a charset parameter. Rejects
/// lookalikes such as `application/jsonp` or `text/json`.
pub fn parse_content_type(content_type: &str) -> Result<mime::Mime, ApiError> {
    let media_type: mime::Mime = content_type.parse().map_err(|_| {
        ApiError::InvalidPayload(format!("invalid Content-Type: {}", content_type))
    })?;

    if media_type.type_() != mime::APPLICATION || media_type.subtype() != mime::JSON {
        return Err(ApiError::InvalidPayload(format!(
            "Content-Type must be application/json, got: {}/{}",
            media_type.type_(),
            media_type.subtype()
        )));
    }

    Ok(media_type)
}

/// Reads the body, stopping as soon as it grows past `max_size`
///
/// The limit applies to the bytes the handler sees, so gzip bodies are
/// bounded after decompression.
pub async fn read_body_limited(body: Body, max_size: usize) -> Result<Bytes, ApiError> {
    match Limited::new(body, max_size).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            Err(ApiError::PayloadTooLarge(max_size))
        }
        Err(err) => Err(ApiError::InvalidPayload(err.to_string())),
    }
}

/// `attachment; filename="…"` with the name reduced to printable ASCII
pub fn content_disposition(filename: &str) -> Result<HeaderValue, ApiError> {
    let safe: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    HeaderValue::from_str(&format!("attachment; filename=\"{}\"", safe))
        .map_err(|e| ApiError::Internal(format!("invalid Content-Disposition: {}", e)))
}
