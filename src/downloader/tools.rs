// External tool discovery: local bin directory first, then the system PATH

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::DownloadError;
use super::installer::{install_ffmpeg, InstallOptions};
use super::utils::run_output_with_timeout;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ToolType {
    YtDlp,
    Ffmpeg,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "yt-dlp",
            ToolType::Ffmpeg => "ffmpeg",
        }
    }

    fn version_arg(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "--version",
            ToolType::Ffmpeg => "-version",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub tool_type: ToolType,
    pub version: Option<String>,
    pub path: Option<String>,
    pub is_available: bool,
}

/// Resolves external binaries against a fixed search path computed once.
#[derive(Debug, Clone)]
pub struct ToolManager {
    bin_dir: Option<PathBuf>,
    search_path: OsString,
}

impl ToolManager {
    /// Search `bin_dir` (when it exists) before the process PATH.
    pub fn new(bin_dir: Option<PathBuf>) -> Self {
        let system_path = std::env::var_os("PATH").unwrap_or_default();
        Self::with_system_path(bin_dir, system_path)
    }

    pub fn with_system_path(bin_dir: Option<PathBuf>, system_path: OsString) -> Self {
        let system_dirs: Vec<PathBuf> = std::env::split_paths(&system_path)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        let system_only = std::env::join_paths(&system_dirs).unwrap_or(system_path);

        let Some(dir) = bin_dir.filter(|dir| dir.is_dir()) else {
            return Self {
                bin_dir: None,
                search_path: system_only,
            };
        };

        let dirs = std::iter::once(dir.clone()).chain(system_dirs.iter().cloned());
        match std::env::join_paths(dirs) {
            Ok(search_path) => {
                tracing::info!("Adding {} to tool search path", dir.display());
                Self {
                    bin_dir: Some(dir),
                    search_path,
                }
            }
            // A separator inside the directory name cannot be expressed in PATH
            Err(e) => {
                tracing::warn!("Ignoring bin dir {}: {}", dir.display(), e);
                Self {
                    bin_dir: None,
                    search_path: system_only,
                }
            }
        }
    }

    /// Install a static ffmpeg build into `bin_dir` and return a manager
    /// that searches it first.
    pub async fn install_ffmpeg(
        bin_dir: &Path,
        options: &InstallOptions,
    ) -> Result<Self, DownloadError> {
        install_ffmpeg(bin_dir, options).await?;
        Ok(Self::new(Some(bin_dir.to_path_buf())))
    }

    /// Local bin directory, if it exists
    pub fn bin_dir(&self) -> Option<&Path> {
        self.bin_dir.as_deref()
    }

    /// PATH value to hand to child processes
    pub fn search_path(&self) -> &OsString {
        &self.search_path
    }

    /// Resolve a program name against the search path. Names containing a
    /// path separator are checked as given.
    pub fn find_program(&self, program: &str) -> Option<PathBuf> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        which::which_in(program, Some(&self.search_path), cwd).ok()
    }

    pub fn find(&self, tool_type: ToolType) -> Option<PathBuf> {
        self.find_program(tool_type.as_str())
    }

    pub fn is_available(&self, tool_type: ToolType) -> bool {
        self.find(tool_type).is_some()
    }

    pub async fn get_tool_info(&self, tool_type: ToolType) -> ToolInfo {
        let path = self.find(tool_type);
        let version = match &path {
            Some(p) => self.get_version(p, tool_type).await,
            None => None,
        };

        ToolInfo {
            name: tool_type.as_str().to_string(),
            tool_type,
            version,
            is_available: path.is_some(),
            path: path.map(|p| p.to_string_lossy().to_string()),
        }
    }

    pub async fn get_all_tools(&self) -> Vec<ToolInfo> {
        vec![
            self.get_tool_info(ToolType::YtDlp).await,
            self.get_tool_info(ToolType::Ffmpeg).await,
        ]
    }

    async fn get_version(&self, path: &Path, tool_type: ToolType) -> Option<String> {
        let program = path.to_string_lossy();
        let args = vec![tool_type.version_arg().to_string()];

        match run_output_with_timeout(&program, args, 10, Some(&self.search_path)).await {
            Ok(output) if output.status.success() => {
                // ffmpeg prints a banner; the first line carries the version
                String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .next()
                    .map(|l| l.trim().to_string())
            }
            _ => None,
        }
    }
}
