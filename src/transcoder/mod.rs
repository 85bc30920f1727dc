//! External transcoding tool (ffmpeg)
//!
//! Availability is probed once at start-up. The probe's result is handed to
//! the orchestrator as an `Option<Arc<dyn Transcoder>>`; `None` means every
//! operation that needs muxing or conversion fails with
//! `TranscoderUnavailable`.

pub mod ffmpeg;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

pub use ffmpeg::FfmpegTranscoder;

#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Combine a video-only and an audio-only file into `output`,
    /// re-encoding audio to AAC
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<()>;

    /// Re-encode `input` into the container implied by `output`'s extension
    async fn convert(&self, input: &Path, output: &Path) -> Result<()>;
}
