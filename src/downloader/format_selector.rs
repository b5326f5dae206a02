// FormatSelector - picks one video URL and one audio URL from a MediaDocument
//
// Video priority:
// 1. Progressive (muxed, direct http) mp4, highest resolution
// 2. Any progressive stream, highest resolution
// 3. The document's generic URL (may be a manifest)
//
// Audio priority:
// 1. Audio-only m4a, highest bitrate
// 2. Any audio-only stream, highest bitrate

use super::models::{MediaDocument, SelectionResult, StreamVariant};

const DEFAULT_TITLE: &str = "Video without title";
const DEFAULT_EXT: &str = "mp4";
const DEFAULT_PLATFORM: &str = "Unknown";

/// Deterministic best-format selection
pub struct FormatSelector;

impl FormatSelector {
    /// Select the best video and audio URLs. Never fails; missing
    /// candidates simply leave the URL empty.
    pub fn select(doc: &MediaDocument) -> SelectionResult {
        let video = Self::find_best_video(&doc.formats);
        let audio = Self::find_best_audio(&doc.formats);

        let (video_url, video_format_id) = match video {
            Some(v) => (v.url.clone(), Some(v.format_id.clone())),
            None => {
                if doc.url.is_some() {
                    tracing::warn!(
                        "No progressive stream found, falling back to generic URL (may not be directly playable)"
                    );
                }
                (doc.url.clone(), None)
            }
        };

        SelectionResult {
            status: "success".to_string(),
            title: if doc.title.is_empty() {
                DEFAULT_TITLE.to_string()
            } else {
                doc.title.clone()
            },
            thumbnail: doc.thumbnail.clone().unwrap_or_default(),
            video_url,
            audio_url: audio.and_then(|a| a.url.clone()),
            ext: doc.ext.clone().unwrap_or_else(|| DEFAULT_EXT.to_string()),
            platform: if doc.platform.is_empty() {
                DEFAULT_PLATFORM.to_string()
            } else {
                doc.platform.clone()
            },
            duration: doc.duration.unwrap_or(0.0),
            video_format_id,
            audio_format_id: audio.map(|a| a.format_id.clone()),
        }
    }

    /// Best progressive variant that actually carries a URL
    fn find_best_video(formats: &[StreamVariant]) -> Option<&StreamVariant> {
        let progressive: Vec<&StreamVariant> =
            formats.iter().filter(|f| f.is_progressive()).collect();

        // 1. Progressive mp4
        let best_mp4 = first_max_by(
            progressive.iter().copied().filter(|f| f.ext == "mp4"),
            height_key,
        );
        if let Some(best) = best_mp4.filter(|f| f.direct_url().is_some()) {
            tracing::info!(
                "Selected progressive MP4 video: {} ({}p)",
                best.format_id,
                best.height.unwrap_or(0)
            );
            return Some(best);
        }

        // 2. Any progressive container
        let best_any = first_max_by(progressive.iter().copied(), height_key);
        if let Some(best) = best_any.filter(|f| f.direct_url().is_some()) {
            tracing::info!(
                "Selected fallback progressive video: {} ({}p)",
                best.format_id,
                best.height.unwrap_or(0)
            );
            return Some(best);
        }

        None
    }

    /// Best audio-only variant that actually carries a URL
    fn find_best_audio(formats: &[StreamVariant]) -> Option<&StreamVariant> {
        let audio_only: Vec<&StreamVariant> =
            formats.iter().filter(|f| f.is_audio_only()).collect();

        // 1. m4a
        let best_m4a = first_max_by(
            audio_only.iter().copied().filter(|f| f.ext == "m4a"),
            bitrate_key,
        );
        if let Some(best) = best_m4a.filter(|f| f.direct_url().is_some()) {
            tracing::info!(
                "Selected M4A audio: {} ({}kbps)",
                best.format_id,
                best.abr.unwrap_or(0.0)
            );
            return Some(best);
        }

        // 2. Any audio-only container
        let best_any = first_max_by(audio_only.iter().copied(), bitrate_key);
        if let Some(best) = best_any.filter(|f| f.direct_url().is_some()) {
            tracing::info!(
                "Selected fallback audio: {} ({}kbps)",
                best.format_id,
                best.abr.unwrap_or(0.0)
            );
            return Some(best);
        }

        None
    }
}

fn height_key(f: &StreamVariant) -> f64 {
    f64::from(f.height.unwrap_or(0))
}

fn bitrate_key(f: &StreamVariant) -> f64 {
    f.abr.unwrap_or(0.0)
}

// `Iterator::max_by` keeps the last maximum; ties here go to the first one.
fn first_max_by<'a, I, K>(iter: I, key: K) -> Option<&'a StreamVariant>
where
    I: Iterator<Item = &'a StreamVariant>,
    K: Fn(&StreamVariant) -> f64,
{
    iter.fold(None, |best: Option<&'a StreamVariant>, f| match best {
        Some(b) if key(f) <= key(b) => Some(b),
        _ => Some(f),
    })
}
