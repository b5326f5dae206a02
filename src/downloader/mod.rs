// Downloader module - metadata extraction, stream selection, MP3 conversion
// and ffmpeg provisioning

pub mod errors;
pub mod extractors;
pub mod format_selector;
pub mod installer;
pub mod models;
pub mod tools;
pub mod transcoder;
pub mod utils;

pub use errors::DownloadError;
pub use extractors::{ExtractorConfig, ExtractorMode, InfoExtractor, InfoExtractorOrchestrator};
pub use format_selector::FormatSelector;
pub use installer::{default_ffmpeg_url, InstallOptions};
pub use models::{AudioFile, MediaDocument, SelectionResult, StreamProtocol, StreamVariant};
pub use tools::{ToolInfo, ToolManager, ToolType};
pub use transcoder::{download_filename, AudioTranscoder, TranscodeConfig, YtDlpAudioTranscoder};
