use crate::extractor::models::{Format, VideoInfo};
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Core trait for video-platform clients
///
/// This trait isolates the application from the specific extraction method
/// (yt-dlp today). Everything about the hosting site, including stream URL
/// resolution and signature handling, stays behind it.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Returns a unique identifier for this extractor (e.g., "ytdlp")
    fn id(&self) -> &'static str;

    /// Extracts video information.
    ///
    /// Doubles as the availability check: private, removed or otherwise
    /// restricted videos must fail here with a descriptive error.
    async fn extract_info(&self, url: &str) -> Result<VideoInfo>;

    /// Downloads one format of the video at `url` to exactly `output`
    async fn download_format(&self, url: &str, format: &Format, output: &Path) -> Result<()>;
}
