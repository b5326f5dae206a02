// yt-dlp `--dump-json` output → MediaDocument

use crate::downloader::errors::DownloadError;
use crate::downloader::models::{MediaDocument, StreamProtocol, StreamVariant};

/// Parse JSON output (shared by the CLI and Python extractors)
pub fn parse_media_json(stdout: &[u8]) -> Result<MediaDocument, DownloadError> {
    let json_str = String::from_utf8_lossy(stdout);
    // With --no-playlist yt-dlp prints one object; keep the first line only
    // in case a site still yields several entries.
    let first = json_str
        .lines()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| DownloadError::ParseError("Empty JSON output".to_string()))?;

    let json: serde_json::Value = serde_json::from_str(first)
        .map_err(|e| DownloadError::ParseError(format!("Invalid JSON: {}", e)))?;

    Ok(MediaDocument {
        title: json["title"]
            .as_str()
            .unwrap_or("Video without title")
            .to_string(),
        thumbnail: json["thumbnail"].as_str().map(|s| s.to_string()),
        duration: json["duration"].as_f64(),
        platform: json["extractor_key"]
            .as_str()
            .unwrap_or("Unknown")
            .to_string(),
        ext: json["ext"].as_str().map(|s| s.to_string()),
        url: json["url"].as_str().map(|s| s.to_string()),
        formats: parse_formats(&json),
    })
}

fn parse_formats(json: &serde_json::Value) -> Vec<StreamVariant> {
    let Some(formats_array) = json["formats"].as_array() else {
        return Vec::new();
    };

    formats_array
        .iter()
        .map(|f| StreamVariant {
            format_id: f["format_id"].as_str().unwrap_or("").to_string(),
            ext: f["ext"].as_str().unwrap_or("").to_string(),
            vcodec: f["vcodec"].as_str().map(|s| s.to_string()),
            acodec: f["acodec"].as_str().map(|s| s.to_string()),
            protocol: StreamProtocol::from_ytdlp(f["protocol"].as_str()),
            height: f["height"].as_u64().and_then(|h| u32::try_from(h).ok()),
            abr: f["abr"].as_f64(),
            url: f["url"].as_str().map(|s| s.to_string()),
        })
        .collect()
}
