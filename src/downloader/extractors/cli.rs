// CLI InfoExtractor - uses native `yt-dlp` binary
//
// Advantages:
// - Faster than Python mode
// - No Python dependency

use async_trait::async_trait;

use super::parse::parse_media_json;
use super::traits::{ExtractorConfig, InfoExtractor};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::MediaDocument;
use crate::downloader::utils::run_output_with_timeout;

/// CLI-based info extractor using yt-dlp binary
pub struct CliInfoExtractor {
    config: ExtractorConfig,
}

impl CliInfoExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Build command arguments
    fn build_args(&self, url: &str) -> Vec<String> {
        let mut args = self.config.common_args();
        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl InfoExtractor for CliInfoExtractor {
    fn name(&self) -> &'static str {
        "cli-yt-dlp"
    }

    async fn is_available(&self) -> bool {
        run_output_with_timeout(
            &self.config.ytdlp_path,
            vec!["--version".to_string()],
            10,
            self.config.search_path.as_ref(),
        )
        .await
        .map(|out| out.status.success())
        .unwrap_or(false)
    }

    async fn extract(&self, url: &str) -> Result<MediaDocument, DownloadError> {
        let args = self.build_args(url);
        tracing::debug!(
            "[CliExtractor] Running: {} {}",
            self.config.ytdlp_path,
            args.join(" ")
        );

        let output = run_output_with_timeout(
            &self.config.ytdlp_path,
            args,
            self.config.timeout_seconds,
            self.config.search_path.as_ref(),
        )
        .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!("[CliExtractor] yt-dlp failed: {}", stderr.trim());
            return Err(DownloadError::from(stderr.to_string()));
        }

        parse_media_json(&output.stdout)
    }
}
