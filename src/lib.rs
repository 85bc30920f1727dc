//! tubefetch library
//!
//! Metadata lookup and stream downloads for online videos, built on yt-dlp
//! for retrieval and ffmpeg for muxing and conversion.

pub mod backend;
pub mod catalog;
pub mod downloader;
pub mod extractor;
pub mod transcoder;
pub mod utils;

// Re-export main types for easier use
pub use catalog::{QualityArg, QualityLabel, StreamCatalog};
pub use downloader::{AudioFormat, DownloadRequest, Toolbox, VideoReport, VideoSource};
pub use extractor::{Extractor, Format, VideoInfo, YtDlpExtractor};
pub use transcoder::{FfmpegTranscoder, Transcoder};
pub use utils::{AppSettings, TubefetchError};
