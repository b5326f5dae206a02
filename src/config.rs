// Server configuration - command line flags, each backed by an env var

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::downloader::{
    default_ffmpeg_url, ExtractorConfig, ExtractorMode, InstallOptions, ToolManager,
    TranscodeConfig,
};
use crate::logging::CliLogLevel;

#[derive(Parser, Debug, Clone)]
#[command(name = "media-downloader")]
#[command(about = "HTTP service that resolves media page URLs into direct stream links and MP3 files")]
pub struct ServerConfig {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Address to bind
    #[arg(long, env = "MD_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// HTTP server port
    #[arg(short, long, env = "MD_PORT", default_value = "5000")]
    pub port: u16,

    /// Directory searched for yt-dlp/ffmpeg before the system PATH
    #[arg(long, env = "MD_BIN_DIR", default_value = "bin", global = true)]
    pub bin_dir: PathBuf,

    /// yt-dlp executable name or path
    #[arg(long, env = "MD_YTDLP", default_value = "yt-dlp")]
    pub ytdlp: String,

    /// Python interpreter used for `-m yt_dlp`
    #[arg(long, env = "YTDLP_PYTHON", default_value = "python3")]
    pub python: String,

    /// Extractor backend: cli, python or auto
    #[arg(long, env = "MD_EXTRACTOR_MODE", default_value = "auto")]
    pub extractor_mode: ExtractorMode,

    /// Proxy for yt-dlp and for the ffmpeg download
    #[arg(long, env = "MD_PROXY", global = true)]
    pub proxy: Option<String>,

    /// Time budget for metadata extraction
    #[arg(long, env = "MD_EXTRACT_TIMEOUT", default_value = "60")]
    pub extract_timeout_secs: u64,

    /// Time budget for download plus MP3 conversion
    #[arg(long, env = "MD_TRANSCODE_TIMEOUT", default_value = "600")]
    pub transcode_timeout_secs: u64,

    /// MP3 bitrate in kbps
    #[arg(long, env = "MD_AUDIO_QUALITY", default_value = "192")]
    pub audio_quality: u32,

    /// Console log level (RUST_LOG takes precedence)
    #[arg(long, env = "MD_LOG_LEVEL", value_enum, default_value = "info")]
    pub log_level: CliLogLevel,

    /// Directory for the log file
    #[arg(long, env = "MD_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Download a static ffmpeg build into the bin directory
    InstallFfmpeg(InstallArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InstallArgs {
    /// Archive URL; defaults to the yt-dlp FFmpeg-Builds release for this platform
    #[arg(long, env = "MD_FFMPEG_URL")]
    pub url: Option<String>,

    /// Replace an existing installation
    #[arg(long)]
    pub force: bool,

    /// Time budget for the download and for unpacking
    #[arg(long, default_value = "600")]
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Options for `install-ffmpeg`; None when no build is known for this
    /// platform and no URL was given.
    pub fn install_options(&self, args: &InstallArgs) -> Option<InstallOptions> {
        let source_url = args.url.clone().or_else(default_ffmpeg_url)?;
        Some(InstallOptions {
            source_url,
            proxy: self.proxy.clone(),
            timeout_seconds: args.timeout_secs,
            force: args.force,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn tool_manager(&self) -> ToolManager {
        ToolManager::new(Some(self.bin_dir.clone()))
    }

    pub fn extractor_config(&self, tools: &ToolManager) -> ExtractorConfig {
        ExtractorConfig {
            ytdlp_path: self.ytdlp.clone(),
            python_cmd: self.python.clone(),
            ..Default::default()
        }
        .with_mode(self.extractor_mode)
        .with_proxy(self.proxy.clone())
        .with_timeout(self.extract_timeout_secs)
        .with_search_path(Some(tools.search_path().clone()))
    }

    pub fn transcode_config(&self) -> TranscodeConfig {
        TranscodeConfig {
            ytdlp_path: self.ytdlp.clone(),
            audio_quality: self.audio_quality,
            timeout_seconds: self.transcode_timeout_secs,
            proxy: self.proxy.clone(),
            scratch_root: None,
        }
    }
}
