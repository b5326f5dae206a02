// Tracing setup - console output at the chosen level plus a full debug log
// file that survives the process.

use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const LOG_FILE_NAME: &str = "media-downloader.log";

/// Keeps the log file handle so it can be flushed on shutdown
pub struct LogGuard {
    file: Arc<File>,
    path: PathBuf,
}

impl LogGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush buffered log data to disk. Call once the server has stopped.
    pub fn shutdown(self) {
        tracing::info!("Shutting down, flushing {}", self.path.display());
        if let Err(e) = self.file.sync_all() {
            tracing::warn!("Failed to sync log file: {}", e);
        }
    }
}

/// Install the global subscriber.
///
/// The console layer honours `RUST_LOG` and falls back to `console_level`;
/// the file layer records everything at debug level without ANSI colours.
///
/// # Errors
///
/// Fails if the log directory or file cannot be created, or if a global
/// subscriber is already installed.
pub fn init_tracing(
    console_level: Level,
    logs_dir: &Path,
) -> Result<LogGuard, Box<dyn std::error::Error>> {
    create_dir_all(logs_dir)?;

    let log_path = logs_dir.join(LOG_FILE_NAME);
    let file = Arc::new(
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?,
    );

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.to_string()));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(Arc::clone(&file))
        .with_filter(EnvFilter::new("debug,hyper=info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!(
        "Tracing initialized: console={}, log_file={}",
        console_level,
        log_path.display()
    );

    Ok(LogGuard {
        file,
        path: log_path,
    })
}

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliLogLevel {
    pub fn as_tracing_level(self) -> Level {
        match self {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}
