// Audio transcoder - yt-dlp downloads the best audio stream and hands it to
// ffmpeg for MP3 conversion inside a private scratch directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use super::errors::DownloadError;
use super::models::AudioFile;
use super::tools::{ToolManager, ToolType};
use super::utils::run_output_with_timeout;

/// Fixed output stem, independent of the media title
const OUTPUT_STEM: &str = "download";
const FALLBACK_TITLE: &str = "audio";

/// Converts a source URL into an in-memory MP3
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    fn name(&self) -> &'static str;

    /// The conversion binary (ffmpeg) can be found
    fn is_available(&self) -> bool;

    async fn extract_audio(&self, url: &str) -> Result<AudioFile, DownloadError>;
}

#[derive(Debug, Clone)]
pub struct TranscodeConfig {
    pub ytdlp_path: String,
    /// Target MP3 bitrate in kbps
    pub audio_quality: u32,
    pub timeout_seconds: u64,
    pub proxy: Option<String>,
    /// Parent for scratch directories; the system temp dir when None
    pub scratch_root: Option<PathBuf>,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: "yt-dlp".to_string(),
            audio_quality: 192,
            timeout_seconds: 600,
            proxy: None,
            scratch_root: None,
        }
    }
}

pub struct YtDlpAudioTranscoder {
    config: TranscodeConfig,
    tools: ToolManager,
}

impl YtDlpAudioTranscoder {
    pub fn new(config: TranscodeConfig, tools: ToolManager) -> Self {
        Self { config, tools }
    }

    fn build_args(&self, url: &str, scratch: &Path) -> Vec<String> {
        let template = scratch.join(format!("{}.%(ext)s", OUTPUT_STEM));

        let mut args = vec![
            "-f".to_string(),
            "bestaudio/best".to_string(),
            "--no-playlist".to_string(),
            "--no-progress".to_string(),
            "--no-warnings".to_string(),
            "-x".to_string(),
            "--audio-format".to_string(),
            "mp3".to_string(),
            "--audio-quality".to_string(),
            format!("{}K", self.config.audio_quality),
            "-o".to_string(),
            template.to_string_lossy().to_string(),
            // Title goes to stdout once the post-processed file is in place
            "--print".to_string(),
            "after_move:title".to_string(),
        ];

        if let Some(bin_dir) = self.tools.bin_dir() {
            args.push("--ffmpeg-location".to_string());
            args.push(bin_dir.to_string_lossy().to_string());
        }

        if let Some(proxy) = &self.config.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args.push(url.to_string());
        args
    }

    fn scratch_dir(&self) -> std::io::Result<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("mp3-");
        match &self.config.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }
}

#[async_trait]
impl AudioTranscoder for YtDlpAudioTranscoder {
    fn name(&self) -> &'static str {
        "yt-dlp+ffmpeg"
    }

    fn is_available(&self) -> bool {
        self.tools.is_available(ToolType::Ffmpeg)
    }

    async fn extract_audio(&self, url: &str) -> Result<AudioFile, DownloadError> {
        // Removed on drop, whichever way this function exits
        let scratch = self.scratch_dir()?;
        tracing::debug!("Created scratch dir: {}", scratch.path().display());

        let args = self.build_args(url, scratch.path());
        let output = run_output_with_timeout(
            &self.config.ytdlp_path,
            args,
            self.config.timeout_seconds,
            Some(self.tools.search_path()),
        )
        .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!("MP3 conversion failed for {}: {}", url, stderr.trim());
            return Err(DownloadError::from(stderr.to_string()));
        }

        let mp3_path = scratch.path().join(format!("{}.mp3", OUTPUT_STEM));
        if !mp3_path.is_file() {
            tracing::error!("Converted file not found: {}", mp3_path.display());
            return Err(DownloadError::ConversionFailed(
                "converted file not found".to_string(),
            ));
        }

        let bytes = tokio::fs::read(&mp3_path).await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let title = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or(FALLBACK_TITLE);
        let filename = download_filename(title);

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            tracing::warn!("Failed to remove {}: {}", scratch_path.display(), e);
        } else {
            tracing::info!("Cleaned up temp dir: {}", scratch_path.display());
        }

        Ok(AudioFile { bytes, filename })
    }
}

/// Human-facing `<title>.mp3`, stripped of characters that are unsafe in
/// file names or headers.
pub fn download_filename(title: &str) -> String {
    lazy_static! {
        static ref UNSAFE_RE: Regex = Regex::new(r#"[/\\:*?"<>|\x00-\x1f\x7f]"#).unwrap();
        static ref SPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    }

    let cleaned = UNSAFE_RE.replace_all(title, " ");
    let collapsed = SPACE_RE.replace_all(cleaned.trim(), " ");
    let stem = collapsed.trim_matches(|c: char| c == '.' || c.is_whitespace());

    if stem.is_empty() {
        format!("{}.mp3", FALLBACK_TITLE)
    } else {
        format!("{}.mp3", stem)
    }
}
