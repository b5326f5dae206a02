// InfoExtractor module - resolves a page URL into a MediaDocument
//
// Provides two modes:
// - CLI mode: Uses native `yt-dlp` binary (faster, no Python dependency)
// - Python mode: Uses `python3 -m yt_dlp`
//
// The Orchestrator tries them in the configured order and stops early when
// the media itself is unavailable.

mod cli;
pub mod diagnostics;
mod orchestrator;
mod parse;
mod python;
mod traits;

pub use cli::CliInfoExtractor;
pub use diagnostics::{diagnose_error, FailureReason};
pub use orchestrator::InfoExtractorOrchestrator;
pub use parse::parse_media_json;
pub use python::PythonInfoExtractor;
pub use traits::{ExtractorConfig, ExtractorMode, InfoExtractor};
