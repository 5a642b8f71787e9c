use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::models::ErrorResponse;
use super::validation::RequestValidationError;
use crate::extract::{DownloadError, ErrorKind};
use crate::profile::ProfileError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("payload invalid: {0}")]
    InvalidPayload(String),
    #[error(transparent)]
    Validation(#[from] RequestValidationError),
    #[error("payload too large: limit is {0} bytes")]
    PayloadTooLarge(usize),
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Download(err) => match err.kind() {
                ErrorKind::MalformedUrl | ErrorKind::UnsupportedPlatform => {
                    StatusCode::BAD_REQUEST
                }
                ErrorKind::FetchFailed | ErrorKind::NoMediaFound => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Profile(err) => match err {
                ProfileError::UserNotFound(_) => StatusCode::NOT_FOUND,
                ProfileError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                ProfileError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                ProfileError::Upstream(_) => StatusCode::BAD_GATEWAY,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidPayload(_) => "INVALID_PAYLOAD",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::Download(err) => err.kind().code(),
            ApiError::Profile(err) => match err {
                ProfileError::UserNotFound(_) => "USER_NOT_FOUND",
                ProfileError::RateLimited => "RATE_LIMITED",
                ProfileError::NotConfigured => "NOT_CONFIGURED",
                ProfileError::Upstream(_) => "UPSTREAM_ERROR",
            },
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::InvalidPayload(value.to_string())
    }
}
