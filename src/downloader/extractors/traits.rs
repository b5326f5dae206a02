// InfoExtractor trait and common types

use std::ffi::OsString;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::downloader::errors::DownloadError;
use crate::downloader::models::MediaDocument;

/// Extraction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractorMode {
    /// Python module yt_dlp
    Python,
    /// CLI binary yt-dlp
    Cli,
    /// Auto-select: CLI → Python fallback
    #[default]
    Auto,
}

impl fmt::Display for ExtractorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Python => write!(f, "python"),
            Self::Cli => write!(f, "cli"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

impl FromStr for ExtractorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" => Ok(Self::Python),
            "cli" => Ok(Self::Cli),
            "auto" => Ok(Self::Auto),
            _ => Err(format!("Invalid extractor mode: {s}")),
        }
    }
}

/// Configuration for info extraction
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub mode: ExtractorMode,
    /// yt-dlp program (name or path)
    pub ytdlp_path: String,
    /// Python interpreter used for `python -m yt_dlp`
    pub python_cmd: String,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// Budget for the whole extraction process, in seconds
    pub timeout_seconds: u64,
    /// PATH handed to child processes
    pub search_path: Option<OsString>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            mode: ExtractorMode::Auto,
            ytdlp_path: "yt-dlp".to_string(),
            python_cmd: "python3".to_string(),
            proxy: None,
            timeout_seconds: 60,
            search_path: None,
        }
    }
}

impl ExtractorConfig {
    pub fn with_mode(mut self, mode: ExtractorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_search_path(mut self, path: Option<OsString>) -> Self {
        self.search_path = path;
        self
    }

    /// yt-dlp flags shared by every backend
    pub fn common_args(&self) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            "30".to_string(),
            "--retries".to_string(),
            "2".to_string(),
            "--user-agent".to_string(),
            USER_AGENT.to_string(),
        ];

        if let Some(proxy) = &self.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args
    }
}

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Resolves a page URL into a MediaDocument.
///
/// Failures are either of the "not found / private / invalid" kind
/// (`DownloadError::is_not_found_class`) or generic.
#[async_trait]
pub trait InfoExtractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    /// Check if this extractor is available
    async fn is_available(&self) -> bool;

    /// Extract media info with all formats
    async fn extract(&self, url: &str) -> Result<MediaDocument, DownloadError>;
}
