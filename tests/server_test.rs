// HTTP surface tests against the router with fake extractor/transcoder

use std::ffi::OsString;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use media_downloader_lib::downloader::extractors::FailureReason;
use media_downloader_lib::downloader::{
    AudioFile, AudioTranscoder, DownloadError, InfoExtractor, MediaDocument, StreamProtocol,
    StreamVariant, ToolManager,
};
use media_downloader_lib::server::{build_router, AppState};

struct FakeExtractor {
    result: Result<MediaDocument, DownloadError>,
}

#[async_trait]
impl InfoExtractor for FakeExtractor {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn extract(&self, _url: &str) -> Result<MediaDocument, DownloadError> {
        self.result.clone()
    }
}

struct FakeTranscoder {
    ffmpeg: bool,
    result: Result<AudioFile, DownloadError>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl AudioTranscoder for FakeTranscoder {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn is_available(&self) -> bool {
        self.ffmpeg
    }

    async fn extract_audio(&self, _url: &str) -> Result<AudioFile, DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

fn variant(id: &str, ext: &str, vcodec: &str, acodec: &str, height: Option<u32>, abr: Option<f64>) -> StreamVariant {
    StreamVariant {
        format_id: id.to_string(),
        ext: ext.to_string(),
        vcodec: Some(vcodec.to_string()),
        acodec: Some(acodec.to_string()),
        protocol: StreamProtocol::DirectHttp,
        height,
        abr,
        url: Some(format!("https://cdn.example.com/{}", id)),
    }
}

fn sample_document() -> MediaDocument {
    MediaDocument {
        title: "Sample".to_string(),
        thumbnail: Some("https://img.example.com/t.jpg".to_string()),
        duration: Some(212.0),
        platform: "Youtube".to_string(),
        ext: Some("mp4".to_string()),
        url: Some("https://manifest.example.com/master.m3u8".to_string()),
        formats: vec![
            variant("18", "mp4", "avc1", "mp4a", Some(360), None),
            variant("22", "mp4", "avc1", "mp4a", Some(720), None),
            variant("140", "m4a", "none", "mp4a", None, Some(128.0)),
            variant("251", "webm", "none", "opus", None, Some(160.0)),
        ],
    }
}

fn router(
    extract: Result<MediaDocument, DownloadError>,
    ffmpeg: bool,
    transcode: Result<AudioFile, DownloadError>,
) -> (Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let state = AppState::new(
        Arc::new(FakeExtractor { result: extract }),
        Arc::new(FakeTranscoder {
            ffmpeg,
            result: transcode,
            calls: Arc::clone(&calls),
        }),
        ToolManager::with_system_path(None, OsString::new()),
    );
    (build_router(state), calls)
}

fn default_router() -> Router {
    router(Ok(sample_document()), true, Ok(sample_audio())).0
}

fn sample_audio() -> AudioFile {
    AudioFile {
        bytes: b"ID3fake-mp3".to_vec(),
        filename: "Sample Song.mp3".to_string(),
    }
}

fn json_post(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}

async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn download_returns_selection() {
    let (status, body) = send_json(
        default_router(),
        json_post("/download", r#"{"url":"https://www.youtube.com/watch?v=abc"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["title"], "Sample");
    assert_eq!(body["video_url"], "https://cdn.example.com/22");
    assert_eq!(body["audio_url"], "https://cdn.example.com/140");
    assert_eq!(body["platform"], "Youtube");
    assert_eq!(body["duration"], 212.0);
    assert!(body.get("video_format_id").is_none());
}

#[tokio::test]
async fn download_applies_defaults() {
    let (app, _) = router(Ok(MediaDocument::default()), true, Ok(sample_audio()));
    let (status, body) = send_json(app, json_post("/download", r#"{"url":"https://example.com/x"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Video without title");
    assert_eq!(body["thumbnail"], "");
    assert_eq!(body["ext"], "mp4");
    assert_eq!(body["platform"], "Unknown");
    assert_eq!(body["duration"], 0.0);
    assert!(body["video_url"].is_null());
    assert!(body["audio_url"].is_null());
}

#[tokio::test]
async fn download_validates_input() {
    let (status, body) = send_json(default_router(), json_post("/download", "not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Request body must be JSON");

    let (status, body) = send_json(default_router(), json_post("/download", "{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "URL parameter is required");

    let (status, body) = send_json(default_router(), json_post("/download", r#"{"url":""}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "URL parameter is required");

    let (status, body) =
        send_json(default_router(), json_post("/download", r#"{"url":"www.example.com"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid URL format. Use http:// or https://");
}

#[tokio::test]
async fn download_without_content_type_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/download")
        .body(Body::from(r#"{"url":"https://example.com"}"#))
        .unwrap();
    let (status, body) = send_json(default_router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Request body must be JSON");
}

#[tokio::test]
async fn download_reports_unavailable_media() {
    let err = DownloadError::Unavailable {
        reason: FailureReason::PrivateVideo,
        diagnostic: "ERROR: [youtube] abc: Private video. Sign in".to_string(),
    };
    let (app, _) = router(Err(err), true, Ok(sample_audio()));
    let (status, body) = send_json(app, json_post("/download", r#"{"url":"https://youtu.be/abc"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Video not found, private, or invalid URL.");
    assert!(body["details"].as_str().unwrap().contains("Private video"));
}

#[tokio::test]
async fn download_reports_generic_failure() {
    let (app, _) = router(Err(DownloadError::Timeout(60)), true, Ok(sample_audio()));
    let (status, body) = send_json(app, json_post("/download", r#"{"url":"https://youtu.be/abc"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Internal Server Error.");
    assert_eq!(body["details"], "Timed out after 60s");
}

#[tokio::test]
async fn mp3_reports_missing_ffmpeg_before_validation() {
    let (app, calls) = router(Ok(sample_document()), false, Ok(sample_audio()));
    let (status, body) = send_json(app, json_post("/download_mp3", "{}")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "FFMPEG_MISSING");
    assert!(body["error"].as_str().unwrap().contains("FFmpeg is not installed"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn mp3_requires_url() {
    let (app, calls) = router(Ok(sample_document()), true, Ok(sample_audio()));
    let (status, body) = send_json(app, json_post("/download_mp3", r#"{"url":null}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "URL parameter is required");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn mp3_serves_attachment() {
    let (status, headers, bytes) = send(
        default_router(),
        json_post("/download_mp3", r#"{"url":"https://youtu.be/abc"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "audio/mpeg");
    assert_eq!(headers[header::CONTENT_LENGTH], "11");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Sample Song.mp3\"; filename*=UTF-8''Sample%20Song.mp3"
    );
    assert_eq!(bytes, b"ID3fake-mp3");
}

#[tokio::test]
async fn mp3_conversion_failure_is_500() {
    let (app, _) = router(
        Ok(sample_document()),
        true,
        Err(DownloadError::ConversionFailed("converted file not found".to_string())),
    );
    let (status, body) = send_json(app, json_post("/download_mp3", r#"{"url":"https://youtu.be/abc"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Conversion failed.");
    assert!(body.get("code").is_none());
}

#[tokio::test]
async fn health_lists_tools() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send_json(default_router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let tools = body["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0]["name"], "yt-dlp");
    assert_eq!(tools[1]["is_available"], false);
}

#[tokio::test]
async fn index_serves_page() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, headers, bytes) = send(default_router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    assert!(String::from_utf8_lossy(&bytes).contains("/download_mp3"));
}
