//! yt-dlp wrapper for video extraction
//!
//! This module handles video information extraction and per-format downloads
//! using yt-dlp. It supports an explicitly configured binary, a bundled one
//! next to our executable, and system-installed yt-dlp.

use crate::extractor::models::{Format, VideoInfo};
use crate::extractor::traits::Extractor;
use crate::utils::error::TubefetchError;
use crate::utils::platform;
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command as AsyncCommand;
use tracing::{debug, error, info};

/// Video-platform client backed by yt-dlp
pub struct YtDlpExtractor {
    ytdlp_path: PathBuf,
}

impl YtDlpExtractor {
    /// Initialize extractor and verify yt-dlp availability
    ///
    /// An explicit path (from settings) wins; otherwise yt-dlp is searched
    /// next to the executable, in PATH and in common install locations.
    pub fn new(explicit: Option<&Path>) -> Result<Self> {
        let ytdlp_path = match explicit {
            Some(path) if platform::is_executable(path) => path.to_path_buf(),
            Some(path) => {
                error!("Configured yt-dlp is not executable: {}", path.display());
                return Err(TubefetchError::YtDlpNotFound.into());
            }
            None => platform::find_tool("yt-dlp").ok_or_else(|| {
                error!("yt-dlp not found anywhere!");
                TubefetchError::YtDlpNotFound
            })?,
        };

        info!("Found yt-dlp at: {}", ytdlp_path.display());
        Ok(Self { ytdlp_path })
    }

    /// Get the path to yt-dlp being used
    pub fn ytdlp_path(&self) -> &Path {
        &self.ytdlp_path
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn id(&self) -> &'static str {
        "ytdlp"
    }

    /// Uses: yt-dlp --dump-json --no-download
    async fn extract_info(&self, url: &str) -> Result<VideoInfo> {
        debug!("Extracting video info for URL: {}", url);

        let output = AsyncCommand::new(&self.ytdlp_path)
            .arg("--dump-json")
            .arg("--no-download")
            .arg("--no-warnings")
            .arg("--no-playlist")
            .arg(url)
            .output()
            .await
            .map_err(TubefetchError::from)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("yt-dlp extraction failed: {}", stderr.trim());
            return Err(TubefetchError::VideoUnavailable(error_summary(&stderr)).into());
        }

        let json_str = String::from_utf8_lossy(&output.stdout);
        let video_info: VideoInfo = serde_json::from_str(json_str.trim())
            .map_err(|e| TubefetchError::ExtractionError(e.to_string()))?;

        debug!(
            "Extracted '{}' with {} formats",
            video_info.title,
            video_info.formats.len()
        );
        Ok(video_info)
    }

    /// Uses: yt-dlp -f <format_id> -o <output>
    async fn download_format(&self, url: &str, format: &Format, output: &Path) -> Result<()> {
        debug!(
            "Downloading format {} of {} to {}",
            format.format_id,
            url,
            output.display()
        );

        let result = AsyncCommand::new(&self.ytdlp_path)
            .arg("-f")
            .arg(&format.format_id)
            .arg("--no-playlist")
            .arg("--no-warnings")
            .arg("--quiet")
            .arg("--force-overwrites")
            .arg("--no-part")
            .arg("-o")
            .arg(escape_output_template(output))
            .arg(url)
            .output()
            .await
            .map_err(TubefetchError::from)?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            error!("yt-dlp download failed: {}", stderr.trim());
            return Err(TubefetchError::DownloadError(error_summary(&stderr)).into());
        }

        if !output.exists() {
            return Err(TubefetchError::DownloadError(format!(
                "yt-dlp reported success but {} is missing",
                output.display()
            ))
            .into());
        }

        Ok(())
    }
}

/// Pick the most useful line out of yt-dlp's stderr
fn error_summary(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    lines
        .iter()
        .rev()
        .find(|line| line.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|line| line.trim_start_matches("ERROR:").trim().to_string())
        .unwrap_or_else(|| "yt-dlp exited without a message".to_string())
}

/// `-o` takes an output template; literal `%` must be doubled
fn escape_output_template(path: &Path) -> String {
    path.to_string_lossy().replace('%', "%%")
}

// ============================================================
// Tests
// ============================================================
