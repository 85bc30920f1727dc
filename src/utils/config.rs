//! Application configuration

use crate::utils::platform;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Folder for downloads that name none, or name an unusable one
    pub download_location: PathBuf,

    /// What happens to muxing intermediates when a download fails
    pub temp_file_policy: TempFilePolicy,

    /// Explicit yt-dlp binary, searched for when unset
    pub ytdlp_path: Option<PathBuf>,

    /// Explicit ffmpeg binary, searched for when unset
    pub ffmpeg_path: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            download_location: platform::default_download_dir(),
            temp_file_policy: TempFilePolicy::AlwaysRemove,
            ytdlp_path: None,
            ffmpeg_path: None,
        }
    }
}

impl AppSettings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings = serde_json::from_str(&json).context("Failed to parse settings")?;
        Ok(settings)
    }

    /// Load settings from the default location, using defaults when the file
    /// is missing or malformed
    pub fn load_or_default() -> Self {
        let path = platform::settings_path();
        if !path.exists() {
            debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring settings file: {:#}", e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        Ok(())
    }
}

/// Fate of temporary muxing inputs after a failed download.
///
/// Intermediates are always removed after a successful download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TempFilePolicy {
    /// Remove intermediates on every exit path
    #[default]
    AlwaysRemove,
    /// Leave intermediates on disk for manual recovery
    KeepOnFailure,
}

impl TempFilePolicy {
    /// Whether intermediates survive a failed download
    pub fn keeps_on_failure(self) -> bool {
        matches!(self, TempFilePolicy::KeepOnFailure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppSettings::default();
        assert_eq!(config.temp_file_policy, TempFilePolicy::AlwaysRemove);
        assert!(config.ytdlp_path.is_none());
        assert!(config.ffmpeg_path.is_none());
        assert!(!config.download_location.as_os_str().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("settings.json");

        let settings = AppSettings {
            download_location: temp.path().join("videos"),
            temp_file_policy: TempFilePolicy::KeepOnFailure,
            ytdlp_path: Some(PathBuf::from("/opt/yt-dlp")),
            ffmpeg_path: None,
        };
        settings.save(&path).unwrap();

        let loaded = AppSettings::load(&path).unwrap();
        assert_eq!(loaded.download_location, settings.download_location);
        assert_eq!(loaded.temp_file_policy, TempFilePolicy::KeepOnFailure);
        assert_eq!(loaded.ytdlp_path, Some(PathBuf::from("/opt/yt-dlp")));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, r#"{ "temp_file_policy": "keep_on_failure" }"#).unwrap();

        let loaded = AppSettings::load(&path).unwrap();
        assert!(loaded.temp_file_policy.keeps_on_failure());
        assert!(loaded.ffmpeg_path.is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(AppSettings::load(&path).is_err());
    }
}
