//! Download requests as issued by front ends

use crate::catalog::{QualityArg, QualityLabel};
use crate::downloader::orchestrator::VideoSource;
use crate::utils::error::TubefetchError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Target container for audio downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    M4a,
    Webm,
    Wav,
}

impl AudioFormat {
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::M4a => "m4a",
            AudioFormat::Webm => "webm",
            AudioFormat::Wav => "wav",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadMode {
    Video,
    Audio,
}

/// One download to perform against an opened video
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub mode: DownloadMode,
    pub quality: Option<QualityArg>,
    pub output_dir: Option<PathBuf>,
    pub audio_format: Option<AudioFormat>,
}

impl DownloadRequest {
    pub fn video(quality: Option<QualityLabel>, output_dir: Option<PathBuf>) -> Self {
        Self {
            mode: DownloadMode::Video,
            quality: quality.map(QualityArg::Video),
            output_dir,
            audio_format: None,
        }
    }

    pub fn audio(
        bitrate: Option<u32>,
        output_dir: Option<PathBuf>,
        audio_format: Option<AudioFormat>,
    ) -> Self {
        Self {
            mode: DownloadMode::Audio,
            quality: bitrate.map(QualityArg::Audio),
            output_dir,
            audio_format,
        }
    }

    /// Check that the quality fits the mode
    pub fn validate(&self) -> Result<(), TubefetchError> {
        if self.mode == DownloadMode::Video && self.audio_format.is_some() {
            return Err(TubefetchError::InvalidQuality(
                "an audio format only applies to audio downloads".to_string(),
            ));
        }

        match (self.mode, self.quality) {
            (DownloadMode::Video, Some(QualityArg::Audio(kbps))) => {
                Err(TubefetchError::InvalidQuality(format!(
                    "{}kbps is an audio bitrate, expected a resolution like 720p",
                    kbps
                )))
            }
            (DownloadMode::Audio, Some(QualityArg::Video(label))) => {
                Err(TubefetchError::InvalidQuality(format!(
                    "{} is a resolution, expected an audio bitrate like 128",
                    label
                )))
            }
            (DownloadMode::Audio, Some(QualityArg::Audio(0))) => Err(
                TubefetchError::InvalidQuality("audio bitrate must be positive".to_string()),
            ),
            _ => Ok(()),
        }
    }

    /// Validate, then run the download and return the produced file
    pub async fn execute(&self, source: &VideoSource) -> Result<PathBuf> {
        self.validate()?;

        let output_dir = self.output_dir.as_deref();
        match (self.mode, self.quality) {
            (DownloadMode::Video, Some(QualityArg::Video(label))) => {
                source.download_video(Some(label), output_dir).await
            }
            (DownloadMode::Video, _) => source.download_video(None, output_dir).await,
            (DownloadMode::Audio, Some(QualityArg::Audio(kbps))) => {
                source
                    .download_audio(Some(kbps), output_dir, self.audio_format)
                    .await
            }
            (DownloadMode::Audio, _) => {
                source
                    .download_audio(None, output_dir, self.audio_format)
                    .await
            }
        }
    }
}
