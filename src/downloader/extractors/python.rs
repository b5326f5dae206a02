// Python InfoExtractor - uses `python3 -m yt_dlp`
//
// Advantages:
// - Works where only the pip package is installed
// - Same extractor code the library exposes in-process
//
// Disadvantages:
// - Requires Python 3 and yt-dlp module
// - Slightly slower than native binary

use async_trait::async_trait;

use super::parse::parse_media_json;
use super::traits::{ExtractorConfig, InfoExtractor};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::MediaDocument;
use crate::downloader::utils::run_output_with_timeout;

/// Python-based info extractor using yt_dlp module
pub struct PythonInfoExtractor {
    config: ExtractorConfig,
}

impl PythonInfoExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Build command arguments
    fn build_args(&self, url: &str) -> Vec<String> {
        let mut args = vec!["-m".to_string(), "yt_dlp".to_string()];
        args.extend(self.config.common_args());
        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl InfoExtractor for PythonInfoExtractor {
    fn name(&self) -> &'static str {
        "python-yt-dlp"
    }

    /// Check if yt_dlp module is installed
    async fn is_available(&self) -> bool {
        run_output_with_timeout(
            &self.config.python_cmd,
            vec!["-c".to_string(), "import yt_dlp".to_string()],
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
            "[PythonExtractor] Running: {} {}",
            self.config.python_cmd,
            args.join(" ")
        );

        let output = run_output_with_timeout(
            &self.config.python_cmd,
            args,
            self.config.timeout_seconds,
            self.config.search_path.as_ref(),
        )
        .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("No module named yt_dlp") {
                return Err(DownloadError::ToolNotFound(
                    "Python yt_dlp module not installed".to_string(),
                ));
            }
            tracing::warn!("[PythonExtractor] yt_dlp failed: {}", stderr.trim());
            return Err(DownloadError::from(stderr.to_string()));
        }

        parse_media_json(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args_runs_module() {
        let extractor = PythonInfoExtractor::new(ExtractorConfig::default());
        let args = extractor.build_args("https://example.com/v");

        assert_eq!(&args[..3], &["-m", "yt_dlp", "--dump-json"]);
        assert_eq!(args.last().map(String::as_str), Some("https://example.com/v"));
    }
}
