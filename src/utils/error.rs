//! Error handling for tubefetch

use thiserror::Error;

/// Main error type for tubefetch
#[derive(Debug, Error)]
pub enum TubefetchError {
    #[error("yt-dlp not found. Please install yt-dlp")]
    YtDlpNotFound,

    #[error("Video unavailable: {0}")]
    VideoUnavailable(String),

    #[error("ffmpeg not found. Cannot perform downloading. Make sure ffmpeg is installed and added in PATH")]
    TranscoderUnavailable,

    #[error("No matching stream: {0}")]
    NoMatchingStream(String),

    #[error("Invalid quality: {0}")]
    InvalidQuality(String),

    #[error("Failed to extract video info: {0}")]
    ExtractionError(String),

    #[error("Download failed: {0}")]
    DownloadError(String),

    #[error("Transcoding failed: {0}")]
    TranscodeFailed(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl TubefetchError {
    /// Find a `TubefetchError` anywhere in an `anyhow` chain
    pub fn find(err: &anyhow::Error) -> Option<&TubefetchError> {
        err.chain().find_map(|cause| cause.downcast_ref::<TubefetchError>())
    }
}
