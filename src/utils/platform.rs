//! Platform-specific utilities for tubefetch
//!
//! This module provides cross-platform abstractions for:
//! - Application directories (config, downloads)
//! - Locating the external tools we drive (yt-dlp, ffmpeg)

use std::path::{Path, PathBuf};
use tracing::debug;

/// Returns the configuration directory
/// - macOS: ~/Library/Application Support/tubefetch
/// - Windows: %APPDATA%\tubefetch
/// - Linux: ~/.config/tubefetch
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tubefetch")
}

/// Returns the path of the settings file
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Returns the default download directory (~/Downloads, or the current directory)
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Platform-specific executable name
pub fn exe_name(tool: &str) -> String {
    if cfg!(target_os = "windows") {
        format!("{}.exe", tool)
    } else {
        tool.to_string()
    }
}

/// Locate an external tool.
///
/// Search order:
/// 1. Next to the current executable (bundled installs)
/// 2. System PATH
/// 3. Common installation paths (Homebrew, /usr/local, ~/.local/bin)
pub fn find_tool(tool: &str) -> Option<PathBuf> {
    let binary = exe_name(tool);

    if let Some(bundled) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&binary)))
        .filter(|path| is_executable(path))
    {
        debug!("Using bundled {}: {:?}", tool, bundled);
        return Some(bundled);
    }

    if let Ok(path) = which::which(&binary) {
        debug!("Using {} from PATH: {:?}", tool, path);
        return Some(path);
    }

    let mut common = vec![
        PathBuf::from("/opt/homebrew/bin").join(&binary),
        PathBuf::from("/usr/local/bin").join(&binary),
        PathBuf::from("/usr/bin").join(&binary),
    ];
    if let Some(home) = dirs::home_dir() {
        common.push(home.join(".local").join("bin").join(&binary));
    }

    common.into_iter().find(|path| is_executable(path))
}

/// Check if a file is executable
pub fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        std::fs::metadata(path)
            .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.is_file()
    }
}
