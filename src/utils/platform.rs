//! Platform-specific utilities for locating yt-dlp
//!
//! Lookup order:
//! - explicit override
//! - next to the current executable (bundled installs)
//! - system PATH
//! - common installation paths (Homebrew, system, pip user installs)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Platform-specific yt-dlp executable name
pub fn ytdlp_binary_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "yt-dlp.exe"
    } else {
        "yt-dlp"
    }
}

/// Find yt-dlp, honouring an explicit override first
pub fn find_ytdlp(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        if is_executable(path) {
            info!("Using configured yt-dlp: {:?}", path);
            return Some(path.to_path_buf());
        }
        warn!("Configured yt-dlp is not executable: {:?}", path);
    }

    if let Some(bundled) = find_adjacent() {
        info!("Using bundled yt-dlp: {:?}", bundled);
        return Some(bundled);
    }

    if let Ok(system) = which::which(ytdlp_binary_name()) {
        info!("Using system yt-dlp: {:?}", system);
        return Some(system);
    }

    if let Some(common) = find_in_common_paths() {
        info!("Using yt-dlp from common path: {:?}", common);
        return Some(common);
    }

    warn!("yt-dlp not found anywhere");
    None
}

fn find_adjacent() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let exe_dir = exe_path.parent()?;
    let candidate = exe_dir.join(ytdlp_binary_name());
    debug!("Checking adjacent path: {:?}", candidate);
    is_executable(&candidate).then_some(candidate)
}

/// Common installation locations, with `~` expanded
pub fn common_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = [
        // macOS Homebrew (Apple Silicon)
        "/opt/homebrew/bin/yt-dlp",
        // macOS Homebrew (Intel)
        "/usr/local/bin/yt-dlp",
        "/usr/bin/yt-dlp",
        "/Library/Frameworks/Python.framework/Versions/Current/bin/yt-dlp",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".local").join("bin").join(ytdlp_binary_name()));
    }

    paths
}

fn find_in_common_paths() -> Option<PathBuf> {
    common_paths().into_iter().find(|p| is_executable(p))
}

/// Check if a file is executable
pub fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        if let Ok(metadata) = std::fs::metadata(path) {
            // Any executable bit counts
            return metadata.is_file() && metadata.permissions().mode() & 0o111 != 0;
        }
        return false;
    }

    #[cfg(not(unix))]
    {
        return path.is_file();
    }
}
