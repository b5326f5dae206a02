// Failure diagnostics - classifies yt-dlp error output
//
// Analyzes error messages to determine:
// - Why the extractor could not resolve the URL
// - Whether it belongs to the "not found / private / invalid" class
// - A short human-readable description for logs

use serde::{Deserialize, Serialize};

/// Reasons an extraction can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// No extractor matches the URL
    UnsupportedUrl,

    /// Private video requiring authorization
    PrivateVideo,

    /// Video deleted or unavailable
    VideoUnavailable,

    /// Age-restricted content requiring login
    AgeRestricted,

    /// Geographic restriction
    GeoBlocked,

    /// DRM-protected or paid content
    DrmProtected,

    /// Member-only content (requires channel membership)
    MembersOnly,

    /// HTTP 403 Forbidden
    Http403Forbidden,

    /// Rate limiting (429 or similar)
    RateLimited,

    /// Bot detection triggered
    BotDetection,

    /// Network timeout
    NetworkTimeout,

    /// Generic/unknown failure
    Unknown,
}

impl FailureReason {
    /// Media cannot be served for this URL no matter which backend is asked.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedUrl
                | Self::PrivateVideo
                | Self::VideoUnavailable
                | Self::AgeRestricted
                | Self::GeoBlocked
                | Self::DrmProtected
                | Self::MembersOnly
        )
    }

    /// Retrying with another backend might help
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Http403Forbidden
                | Self::NetworkTimeout
                | Self::RateLimited
                | Self::BotDetection
                | Self::Unknown
        )
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::UnsupportedUrl => "Unsupported URL",
            Self::PrivateVideo => "Private video",
            Self::VideoUnavailable => "Video unavailable",
            Self::AgeRestricted => "Age-restricted content",
            Self::GeoBlocked => "Geographic restriction",
            Self::DrmProtected => "DRM-protected content",
            Self::MembersOnly => "Members-only content",
            Self::Http403Forbidden => "Access denied (HTTP 403)",
            Self::RateLimited => "Rate limited",
            Self::BotDetection => "Bot detection triggered",
            Self::NetworkTimeout => "Network timeout",
            Self::Unknown => "Extraction failed",
        }
    }
}

/// Analyze error message and return failure reason
pub fn diagnose_error(error: &str) -> Option<FailureReason> {
    if error.trim().is_empty() {
        return None;
    }

    let lower = error.to_lowercase();

    // Check patterns in order of specificity

    if lower.contains("unsupported url")
        || lower.contains("is not a valid url")
        || lower.contains("no video formats found")
    {
        return Some(FailureReason::UnsupportedUrl);
    }

    if lower.contains("drm")
        || lower.contains("widevine")
        || lower.contains("requires purchase")
        || lower.contains("rental")
        || lower.contains("this video requires payment")
    {
        return Some(FailureReason::DrmProtected);
    }

    if lower.contains("members only")
        || lower.contains("members-only")
        || lower.contains("join this channel")
        || lower.contains("available to members")
    {
        return Some(FailureReason::MembersOnly);
    }

    if lower.contains("age-restricted")
        || lower.contains("sign in to confirm your age")
        || lower.contains("age_verification")
    {
        return Some(FailureReason::AgeRestricted);
    }

    if lower.contains("private video")
        || lower.contains("video is private")
        || lower.contains("sign in if you've been granted access")
    {
        return Some(FailureReason::PrivateVideo);
    }

    if lower.contains("video unavailable")
        || lower.contains("video has been removed")
        || lower.contains("this video is no longer available")
        || lower.contains("video is unavailable")
        || lower.contains("http error 404")
    {
        return Some(FailureReason::VideoUnavailable);
    }

    if lower.contains("not available in your country")
        || lower.contains("blocked in your country")
        || lower.contains("geo restriction")
        || lower.contains("geo-restricted")
    {
        return Some(FailureReason::GeoBlocked);
    }

    if lower.contains("429") || lower.contains("rate limit") || lower.contains("too many requests") {
        return Some(FailureReason::RateLimited);
    }

    if lower.contains("confirm you're not a bot")
        || lower.contains("captcha")
        || lower.contains("unusual traffic")
    {
        return Some(FailureReason::BotDetection);
    }

    if lower.contains("403") || lower.contains("forbidden") {
        return Some(FailureReason::Http403Forbidden);
    }

    if lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("connection refused")
        || lower.contains("network unreachable")
    {
        return Some(FailureReason::NetworkTimeout);
    }

    Some(FailureReason::Unknown)
}
