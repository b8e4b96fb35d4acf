//! Error type returned by route handlers.
//!
//! Every failure is rendered as `{"message": "..."}`. Internal errors are
//! logged with their cause but answered with a generic message.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::track_store::InvalidTrackId;
use crate::uploads::UploadError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Audio file is required")]
    MissingAudioFile,

    #[error("Invalid multipart body: {0}")]
    InvalidMultipart(#[from] MultipartError),

    #[error("Invalid query parameters: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    InvalidTrackId(#[from] InvalidTrackId),

    #[error("Audio file is too large")]
    UploadTooLarge,

    #[error("Track not found")]
    TrackNotFound,

    #[error("Not found")]
    RouteNotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingAudioFile
            | ApiError::InvalidMultipart(_)
            | ApiError::InvalidQuery(_)
            | ApiError::InvalidTrackId(_)
            | ApiError::UploadTooLarge => StatusCode::BAD_REQUEST,
            ApiError::TrackNotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::InvalidMultipart(_) => "Invalid multipart body".to_string(),
            ApiError::InvalidQuery(_) => "Invalid query parameters".to_string(),
            ApiError::InvalidTrackId(_) => "Invalid track id".to_string(),
            ApiError::Internal(_) => "Server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::FileTooLarge(_, _) => ApiError::UploadTooLarge,
            UploadError::Io(io) => {
                ApiError::Internal(anyhow::Error::new(io).context("Failed to store audio file"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(err) => error!("Request failed: {:#}", err),
            ApiError::InvalidMultipart(err) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return ApiError::UploadTooLarge.into_response();
            }
            other => tracing::debug!("Rejected request: {}", other),
        }
        (
            status,
            Json(ErrorResponse {
                message: self.public_message(),
            }),
        )
            .into_response()
    }
}
