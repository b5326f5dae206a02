// Route handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::error::{ApiError, MSG_BODY_NOT_JSON, MSG_URL_INVALID, MSG_URL_REQUIRED};
use super::AppState;
use crate::downloader::utils::is_http_url;
use crate::downloader::{FormatSelector, SelectionResult};

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub url: Option<String>,
}

/// Pull a usable URL out of the request body.
fn require_url(body: Result<Json<DownloadRequest>, JsonRejection>) -> Result<String, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest(MSG_BODY_NOT_JSON)
    })?;

    let url = match request.url {
        Some(url) if !url.is_empty() => url,
        _ => return Err(ApiError::BadRequest(MSG_URL_REQUIRED)),
    };

    if !is_http_url(&url) {
        tracing::warn!("Invalid URL format: {}", url);
        return Err(ApiError::BadRequest(MSG_URL_INVALID));
    }

    Ok(url)
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let tools = state.tools.get_all_tools().await;
    Json(json!({ "status": "ok", "tools": tools }))
}

pub async fn download(
    State(state): State<AppState>,
    body: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Json<SelectionResult>, ApiError> {
    let url = require_url(body)?;
    tracing::info!("Processing request for URL: {}", url);

    let doc = state.extractor.extract(&url).await.map_err(|e| {
        tracing::error!("Extraction failed for {}: {}", url, e.diagnostic());
        ApiError::from_extraction(&e)
    })?;

    let result = FormatSelector::select(&doc);
    tracing::info!(
        "Selected streams for '{}': video={:?} audio={:?}",
        result.title,
        result.video_format_id,
        result.audio_format_id
    );

    Ok(Json(result))
}

pub async fn download_mp3(
    State(state): State<AppState>,
    body: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    // Dependency check comes before input validation
    if !state.transcoder.is_available() {
        tracing::error!("ffmpeg not found, refusing MP3 conversion");
        return Err(ApiError::FfmpegMissing);
    }

    let url = require_url(body)?;
    tracing::info!("Processing MP3 download for: {}", url);

    let audio = state.transcoder.extract_audio(&url).await.map_err(|e| {
        tracing::error!("MP3 download failed for {}: {}", url, e.diagnostic());
        ApiError::from_transcode(&e)
    })?;

    let disposition = HeaderValue::from_str(&content_disposition(&audio.filename))
        .map_err(|e| ApiError::Internal(format!("invalid Content-Disposition: {}", e)))?;

    tracing::info!("Serving file from memory: {} ({} bytes)", audio.filename, audio.bytes.len());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg")),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, HeaderValue::from(audio.bytes.len())),
        ],
        audio.bytes,
    )
        .into_response())
}

/// `attachment` disposition with an ASCII fallback and an RFC 5987
/// `filename*` carrying the exact UTF-8 name.
pub fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(filename)
    )
}
