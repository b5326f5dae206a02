// ffmpeg provisioning - fetch a static build and drop the binaries into the
// local bin directory that ToolManager searches first.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::AsyncWriteExt;

use super::errors::DownloadError;
use super::utils::run_output_with_timeout;

const FFMPEG_BUILDS_BASE: &str = "https://github.com/yt-dlp/FFmpeg-Builds/releases/download/latest";

/// Published static build for the running platform, if there is one
pub fn default_ffmpeg_url() -> Option<String> {
    let asset = match (std::env::consts::OS, std::env::consts::ARCH) {
        ("linux", "x86_64") => "ffmpeg-master-latest-linux64-gpl.tar.xz",
        ("linux", "aarch64") => "ffmpeg-master-latest-linuxarm64-gpl.tar.xz",
        ("windows", "x86_64") => "ffmpeg-master-latest-win64-gpl.zip",
        ("windows", "aarch64") => "ffmpeg-master-latest-winarm64-gpl.zip",
        _ => return None,
    };
    Some(format!("{}/{}", FFMPEG_BUILDS_BASE, asset))
}

#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Archive (tar.xz, tar.gz or zip) containing `bin/ffmpeg`
    pub source_url: String,
    pub proxy: Option<String>,
    /// Budget for the download and for unpacking, each
    pub timeout_seconds: u64,
    /// Replace binaries that are already present
    pub force: bool,
}

fn binary_name(stem: &str) -> String {
    format!("{}{}", stem, std::env::consts::EXE_SUFFIX)
}

/// Install ffmpeg (and ffprobe when the archive has it) into `bin_dir`.
/// Returns the paths of the binaries now in place.
pub async fn install_ffmpeg(
    bin_dir: &Path,
    options: &InstallOptions,
) -> Result<Vec<PathBuf>, DownloadError> {
    let ffmpeg_target = bin_dir.join(binary_name("ffmpeg"));
    if ffmpeg_target.is_file() && !options.force {
        tracing::info!("FFmpeg already installed at {}", ffmpeg_target.display());
        return Ok(vec![ffmpeg_target]);
    }

    tokio::fs::create_dir_all(bin_dir).await?;

    // Archive and unpacked tree live here; removed on every exit path
    let scratch = tempfile::Builder::new().prefix("ffmpeg-install-").tempdir()?;
    let archive_name = options
        .source_url
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("ffmpeg-archive");
    let archive = scratch.path().join(archive_name);
    let unpacked = scratch.path().join("unpacked");
    tokio::fs::create_dir_all(&unpacked).await?;

    tracing::info!("Downloading FFmpeg from {}", options.source_url);
    let size = fetch_to_file(&options.source_url, options.proxy.as_deref(), options.timeout_seconds, &archive).await?;
    tracing::info!("Download complete ({} bytes)", size);

    let output = run_output_with_timeout(
        "tar",
        vec![
            "-xf".to_string(),
            archive.to_string_lossy().to_string(),
            "-C".to_string(),
            unpacked.to_string_lossy().to_string(),
        ],
        options.timeout_seconds,
        None,
    )
    .await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DownloadError::ExecutionError(format!(
            "Failed to unpack {}: {}",
            archive_name,
            stderr.trim()
        )));
    }

    let ffmpeg_source = find_file(&unpacked, &binary_name("ffmpeg")).ok_or_else(|| {
        DownloadError::ToolNotFound(format!("ffmpeg not found in {}", archive_name))
    })?;

    let mut installed = vec![copy_executable(&ffmpeg_source, &ffmpeg_target).await?];

    match find_file(&unpacked, &binary_name("ffprobe")) {
        Some(source) => {
            let target = bin_dir.join(binary_name("ffprobe"));
            installed.push(copy_executable(&source, &target).await?);
        }
        None => tracing::warn!("ffprobe not found in {}, installing ffmpeg only", archive_name),
    }

    for path in &installed {
        tracing::info!("Installed {}", path.display());
    }
    Ok(installed)
}

async fn fetch_to_file(
    url: &str,
    proxy: Option<&str>,
    timeout_secs: u64,
    dest: &Path,
) -> Result<u64, DownloadError> {
    let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(timeout_secs));
    if let Some(proxy_url) = proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
    }
    let client = builder.build()?;

    let mut response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(DownloadError::Fetch(format!("HTTP {} from {}", response.status(), url)));
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut total = 0u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        total += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(total)
}

/// Depth-first search for a regular file named `name`
fn find_file(root: &Path, name: &str) -> Option<PathBuf> {
    let entries = std::fs::read_dir(root).ok()?;
    let mut dirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        } else if entry.file_name() == name {
            return Some(path);
        }
    }
    dirs.sort();
    dirs.iter().find_map(|dir| find_file(dir, name))
}

async fn copy_executable(source: &Path, target: &Path) -> Result<PathBuf, DownloadError> {
    tokio::fs::copy(source, target).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(target, std::fs::Permissions::from_mode(0o755)).await?;
    }

    Ok(target.to_path_buf())
}
