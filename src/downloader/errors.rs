// Error types for extraction and transcoding

use thiserror::Error;

use super::extractors::diagnostics::{diagnose_error, FailureReason};

#[derive(Debug, Clone, Error)]
pub enum DownloadError {
    /// Media is missing, private, region-locked or the URL is not supported.
    /// `diagnostic` keeps the raw extractor output for logs and API details.
    #[error("{}", .reason.description())]
    Unavailable {
        reason: FailureReason,
        diagnostic: String,
    },

    /// yt-dlp, python or ffmpeg not found
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Failed to parse yt-dlp JSON output
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Command execution failed
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// External process exceeded its time budget
    #[error("Timed out after {0}s")]
    Timeout(u64),

    /// Transcoder exited but the expected output file is missing
    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    #[error("I/O error: {0}")]
    Io(String),

    /// Fetching a remote resource failed
    #[error("Download failed: {0}")]
    Fetch(String),

    /// Unknown error with details
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl DownloadError {
    /// True for the "video not found, private, or invalid URL" class.
    pub fn is_not_found_class(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Another extractor backend might still succeed. False only when the
    /// media itself cannot be served (private, removed, geo-blocked...).
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable { reason, .. } => reason.is_retryable(),
            _ => true,
        }
    }

    /// Raw diagnostic text, separate from the user-facing message.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Unavailable { diagnostic, .. } => diagnostic.clone(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<reqwest::Error> for DownloadError {
    fn from(e: reqwest::Error) -> Self {
        Self::Fetch(e.to_string())
    }
}

// Classify raw yt-dlp stderr. Anything yt-dlp itself reports as an ERROR
// belongs to the not-found class; the rest is an internal failure.
impl From<String> for DownloadError {
    fn from(s: String) -> Self {
        let reason = diagnose_error(&s).unwrap_or(FailureReason::Unknown);
        if reason.is_unavailable() || s.contains("ERROR:") {
            return Self::Unavailable {
                reason,
                diagnostic: s,
            };
        }

        let lower = s.to_lowercase();
        if lower.contains("command not found") || lower.contains("no such file") {
            Self::ToolNotFound(s)
        } else if lower.contains("json") {
            Self::ParseError(s)
        } else {
            Self::Unknown(s)
        }
    }
}
