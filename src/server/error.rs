// API error type - maps failures onto status codes and JSON bodies

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::downloader::DownloadError;

pub const MSG_BODY_NOT_JSON: &str = "Request body must be JSON";
pub const MSG_URL_REQUIRED: &str = "URL parameter is required";
pub const MSG_URL_INVALID: &str = "Invalid URL format. Use http:// or https://";
pub const MSG_NOT_FOUND: &str = "Video not found, private, or invalid URL.";
pub const MSG_EXTRACTION_FAILED: &str = "Internal Server Error.";
pub const MSG_UNEXPECTED: &str = "An unexpected error occurred on the server.";
pub const MSG_CONVERSION_FAILED: &str = "Conversion failed.";
pub const MSG_FFMPEG_MISSING: &str =
    "FFmpeg is not installed on this server. Please install FFmpeg to enable MP3 conversion.";
pub const CODE_FFMPEG_MISSING: &str = "FFMPEG_MISSING";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request, 400
    #[error("{0}")]
    BadRequest(&'static str),

    /// Extraction failed, 400 with the raw diagnostic alongside
    #[error("{message}")]
    Extraction { message: &'static str, details: String },

    /// ffmpeg not discoverable, 500 with a stable code
    #[error("{}", MSG_FFMPEG_MISSING)]
    FfmpegMissing,

    /// Transcoding failed, 500 with a short message
    #[error("{0}")]
    Transcode(String),

    /// Anything else, 500 with a generic message
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Classify a failure from the `/download` pipeline.
    pub fn from_extraction(err: &DownloadError) -> Self {
        let message = if err.is_not_found_class() {
            MSG_NOT_FOUND
        } else {
            MSG_EXTRACTION_FAILED
        };
        Self::Extraction {
            message,
            details: err.diagnostic(),
        }
    }

    /// Classify a failure from the `/download_mp3` pipeline.
    pub fn from_transcode(err: &DownloadError) -> Self {
        match err {
            DownloadError::ConversionFailed(_) => Self::Transcode(MSG_CONVERSION_FAILED.to_string()),
            other => Self::Transcode(other.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Extraction { .. } => StatusCode::BAD_REQUEST,
            Self::FfmpegMissing | Self::Transcode(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::BadRequest(message) => json!({ "error": message }),
            Self::Extraction { message, details } => json!({ "error": message, "details": details }),
            Self::FfmpegMissing => json!({ "error": MSG_FFMPEG_MISSING, "code": CODE_FFMPEG_MISSING }),
            Self::Transcode(message) => json!({ "error": message }),
            Self::Internal(detail) => {
                tracing::error!("Unhandled server error: {}", detail);
                json!({ "error": MSG_UNEXPECTED })
            }
        };
        (status, Json(body)).into_response()
    }
}
