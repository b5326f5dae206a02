// Common data models for extraction, selection and transcoding

use serde::{Deserialize, Serialize};

/// Codec value yt-dlp uses for "stream has no such track"
pub const NO_CODEC: &str = "none";

/// Transport used to fetch a stream variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamProtocol {
    /// Single resource over plain http(s)
    DirectHttp,
    /// Index file referencing segments (HLS, DASH, ...)
    Manifest,
    Other,
}

impl StreamProtocol {
    /// Map a yt-dlp `protocol` value
    pub fn from_ytdlp(protocol: Option<&str>) -> Self {
        match protocol {
            Some("http") | Some("https") => Self::DirectHttp,
            Some("m3u8") | Some("m3u8_native") | Some("http_dash_segments") | Some("dash")
            | Some("f4m") | Some("ism") => Self::Manifest,
            _ => Self::Other,
        }
    }
}

/// One downloadable variant of a media item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamVariant {
    /// Format ID (e.g., "137", "140")
    pub format_id: String,
    /// Container / file extension (mp4, webm, m4a)
    pub ext: String,
    /// Video codec (avc1, vp9, "none"); None when the extractor did not say
    pub vcodec: Option<String>,
    /// Audio codec (mp4a, opus, "none"); None when the extractor did not say
    pub acodec: Option<String>,
    pub protocol: StreamProtocol,
    /// Vertical resolution in pixels
    pub height: Option<u32>,
    /// Average audio bitrate in kbps
    pub abr: Option<f64>,
    /// Direct resource URL
    pub url: Option<String>,
}

impl StreamVariant {
    // An unreported codec counts as present, the way yt-dlp treats it.
    pub fn has_video(&self) -> bool {
        self.vcodec.as_deref() != Some(NO_CODEC)
    }

    pub fn has_audio(&self) -> bool {
        self.acodec.as_deref() != Some(NO_CODEC)
    }

    /// Audio track only, the video codec is explicitly "none"
    pub fn is_audio_only(&self) -> bool {
        self.vcodec.as_deref() == Some(NO_CODEC) && self.has_audio()
    }

    /// Muxed audio+video served as a single direct download
    pub fn is_progressive(&self) -> bool {
        self.protocol == StreamProtocol::DirectHttp && self.has_video() && self.has_audio()
    }

    /// The resource URL, when present and non-empty
    pub fn direct_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }
}

/// A media item as described by the extractor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaDocument {
    pub title: String,
    pub thumbnail: Option<String>,
    /// Duration in seconds
    pub duration: Option<f64>,
    /// Extractor key (e.g., "Youtube", "Vimeo")
    pub platform: String,
    /// Extension of the extractor's default format
    pub ext: Option<String>,
    /// Generic URL of the default format; may point at a manifest
    pub url: Option<String>,
    pub formats: Vec<StreamVariant>,
}

/// Outcome of format selection, serialized as the `/download` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub status: String,
    pub title: String,
    pub thumbnail: String,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub ext: String,
    pub platform: String,
    pub duration: f64,
    #[serde(skip)]
    pub video_format_id: Option<String>,
    #[serde(skip)]
    pub audio_format_id: Option<String>,
}

/// MP3 produced by the transcoder, held in memory
#[derive(Debug, Clone)]
pub struct AudioFile {
    pub bytes: Vec<u8>,
    /// Human-facing download name, e.g. "My Song.mp3"
    pub filename: String,
}
