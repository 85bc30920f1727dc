//! Download orchestration for one video
//!
//! `VideoSource` is opened once per URL. Opening fetches the metadata, which
//! doubles as the availability check, and builds the stream catalog. After
//! that the source is read-only and can be shared between concurrent
//! downloads.

use crate::catalog::{bitrate_label, QualityLabel, StreamCatalog};
use crate::downloader::artifacts::ScratchFiles;
use crate::downloader::engine::{DownloadConfig, DownloadEngine};
use crate::downloader::request::AudioFormat;
use crate::extractor::{Extractor, VideoInfo, YtDlpExtractor};
use crate::transcoder::{FfmpegTranscoder, Transcoder};
use crate::utils::config::{AppSettings, TempFilePolicy};
use crate::utils::error::TubefetchError;
use crate::utils::filename::sanitize_title;
use crate::utils::paths::resolve_output_dir;
use crate::utils::time::readable_time;
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_THUMBNAIL_NAME: &str = "thumbnail.jpg";

/// External collaborators of every download
#[derive(Clone)]
pub struct Toolbox {
    pub extractor: Arc<dyn Extractor>,
    /// `None` when ffmpeg was not found at start-up
    pub transcoder: Option<Arc<dyn Transcoder>>,
    pub engine: Arc<DownloadEngine>,
    pub temp_policy: TempFilePolicy,
    /// Used when a download names no folder, or an unusable one
    pub download_dir: PathBuf,
}

impl Toolbox {
    /// Locate yt-dlp, probe ffmpeg once and build the HTTP engine
    pub fn from_settings(settings: &AppSettings) -> Result<Self> {
        let extractor = YtDlpExtractor::new(settings.ytdlp_path.as_deref())?;

        let transcoder = FfmpegTranscoder::probe(settings.ffmpeg_path.as_deref())
            .map(|ffmpeg| Arc::new(ffmpeg) as Arc<dyn Transcoder>);
        if transcoder.is_none() {
            warn!("ffmpeg not found, only progressive and native-format downloads are possible");
        }

        Ok(Self {
            extractor: Arc::new(extractor),
            transcoder,
            engine: Arc::new(DownloadEngine::new(DownloadConfig::default())?),
            temp_policy: settings.temp_file_policy,
            download_dir: settings.download_location.clone(),
        })
    }
}

/// An opened, available video
pub struct VideoSource {
    url: String,
    info: VideoInfo,
    catalog: StreamCatalog,
    toolbox: Toolbox,
}

impl VideoSource {
    /// Fetch metadata for `url`, failing with `VideoUnavailable` when the
    /// video cannot be accessed
    pub async fn open(url: &str, toolbox: Toolbox) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(TubefetchError::InvalidUrl("URL is empty".to_string()).into());
        }

        info!("Opening {} with {}", url, toolbox.extractor.id());
        let info = toolbox.extractor.extract_info(url).await.map_err(|e| {
            let is_io = e.chain().any(|cause| cause.is::<std::io::Error>());
            if TubefetchError::find(&e).is_some() || is_io {
                e
            } else {
                TubefetchError::VideoUnavailable(format!("{:#}", e)).into()
            }
        })?;

        let catalog = StreamCatalog::from_formats(&info.formats);
        debug!(
            "{}: {} streams, {} video qualities",
            info.title,
            catalog.streams().len(),
            catalog.video_labels().len()
        );

        Ok(Self {
            url: url.to_string(),
            info,
            catalog,
            toolbox,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.info.title
    }

    /// Duration in seconds
    pub fn length(&self) -> u64 {
        self.info.length()
    }

    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    pub fn catalog(&self) -> &StreamCatalog {
        &self.catalog
    }

    /// Download a video at `quality`, or the best available quality.
    ///
    /// A progressive stream is downloaded directly. Otherwise the video-only
    /// stream and the best audio stream are downloaded to intermediates and
    /// muxed, which requires a transcoder.
    pub async fn download_video(
        &self,
        quality: Option<QualityLabel>,
        output_dir: Option<&Path>,
    ) -> Result<PathBuf> {
        let label = match quality {
            Some(label) => label,
            None => self.catalog.best_video_label().ok_or_else(|| {
                TubefetchError::NoMatchingStream("video has no video streams".to_string())
            })?,
        };

        let dir = self.prepare_dir(output_dir).await?;
        let output = dir.join(format!("{}.mp4", sanitize_title(self.title())));

        if let Some(format) = self.catalog.find_progressive(&label) {
            info!("Downloading {} (format {})", label, format.format_id);
            self.toolbox
                .extractor
                .download_format(&self.url, format, &output)
                .await?;
            info!("Saved {}", output.display());
            return Ok(output);
        }

        let video = self
            .catalog
            .find_video_only(&label)
            .ok_or_else(|| TubefetchError::NoMatchingStream(label.to_string()))?;
        let transcoder = self
            .toolbox
            .transcoder
            .as_ref()
            .ok_or(TubefetchError::TranscoderUnavailable)?;
        let audio = self.catalog.best_audio().ok_or_else(|| {
            TubefetchError::NoMatchingStream(format!("{} has no audio stream to mux with", label))
        })?;

        info!(
            "Downloading {} as video {} + audio {}",
            label, video.format_id, audio.format_id
        );

        let mut scratch = ScratchFiles::new(self.toolbox.temp_policy);
        let video_path = scratch.reserve(&dir, "video", &video.ext)?;
        let audio_path = scratch.reserve(&dir, "audio", &audio.ext)?;

        self.toolbox
            .extractor
            .download_format(&self.url, video, &video_path)
            .await?;
        self.toolbox
            .extractor
            .download_format(&self.url, audio, &audio_path)
            .await?;

        if let Err(e) = transcoder.mux(&video_path, &audio_path, &output).await {
            remove_partial(&output).await;
            return Err(e);
        }

        scratch.succeed();
        info!("Saved {}", output.display());
        Ok(output)
    }

    /// Download an audio stream at `bitrate` kbps, or the best one, optionally
    /// converting it to `format`
    pub async fn download_audio(
        &self,
        bitrate: Option<u32>,
        output_dir: Option<&Path>,
        format: Option<AudioFormat>,
    ) -> Result<PathBuf> {
        let stream = match bitrate {
            Some(0) => {
                return Err(TubefetchError::InvalidQuality(
                    "audio bitrate must be a positive integer".to_string(),
                )
                .into())
            }
            Some(kbps) => self
                .catalog
                .find_audio(kbps)
                .ok_or_else(|| TubefetchError::NoMatchingStream(bitrate_label(kbps)))?,
            None => self.catalog.best_audio().ok_or_else(|| {
                TubefetchError::NoMatchingStream("video has no audio streams".to_string())
            })?,
        };

        let dir = self.prepare_dir(output_dir).await?;
        let stem = sanitize_title(self.title());
        let native = dir.join(file_name(&stem, &stream.ext));

        info!(
            "Downloading audio {} ({})",
            stream.format_id,
            bitrate_label(stream.abr_rounded())
        );
        self.toolbox
            .extractor
            .download_format(&self.url, stream, &native)
            .await?;

        let target = match format {
            Some(target) if target.extension() != stream.ext => target,
            _ => {
                info!("Saved {}", native.display());
                return Ok(native);
            }
        };

        let Some(transcoder) = self.toolbox.transcoder.as_ref() else {
            warn!(
                "Cannot convert to {} without ffmpeg, keeping {}",
                target.extension(),
                native.display()
            );
            return Err(TubefetchError::TranscoderUnavailable.into());
        };

        let converted = dir.join(file_name(&stem, target.extension()));
        if let Err(e) = transcoder.convert(&native, &converted).await {
            remove_partial(&converted).await;
            return Err(e);
        }

        if let Err(e) = tokio::fs::remove_file(&native).await {
            warn!("Failed to remove {}: {}", native.display(), e);
        }

        info!("Saved {}", converted.display());
        Ok(converted)
    }

    /// Download the thumbnail image, named after the last segment of its URL
    pub async fn get_thumbnail(&self, output_dir: Option<&Path>) -> Result<PathBuf> {
        let url = self
            .info
            .thumbnail
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| TubefetchError::DownloadError("video has no thumbnail".to_string()))?;

        let dir = self.prepare_dir(output_dir).await?;
        let output = dir.join(thumbnail_file_name(url));

        self.toolbox.engine.fetch_to_file(url, &output).await?;
        info!("Saved thumbnail {}", output.display());
        Ok(output)
    }

    /// Output folder for one download; never fails on a bad `output_dir`
    async fn prepare_dir(&self, output_dir: Option<&Path>) -> Result<PathBuf> {
        let requested = output_dir.map(Path::to_path_buf);
        let fallback = self.toolbox.download_dir.clone();
        tokio::task::spawn_blocking(move || choose_dir(requested, fallback)).await?
    }

    /// Read-only summary of the video
    pub fn get_info(&self) -> VideoReport {
        VideoReport {
            title: self.info.title.clone(),
            publish_date: self.info.publish_date(),
            description: self.info.description.clone().unwrap_or_default(),
            length: readable_time(self.length()),
            resolutions: self
                .catalog
                .video_labels()
                .iter()
                .map(ToString::to_string)
                .collect(),
            audio_bitrates: self.catalog.audio_labels(),
        }
    }
}

/// Video summary as printed by `--info`
#[derive(Debug, Clone, Serialize)]
pub struct VideoReport {
    pub title: String,
    pub publish_date: Option<NaiveDate>,
    pub description: String,
    pub length: String,
    pub resolutions: Vec<String>,
    pub audio_bitrates: Vec<String>,
}

impl fmt::Display for VideoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "title: {}", self.title)?;
        match self.publish_date {
            Some(date) => writeln!(f, "publish date: {}", date)?,
            None => writeln!(f, "publish date: unknown")?,
        }
        writeln!(f, "description:")?;
        writeln!(f, "{}", self.description)?;
        writeln!(f, "length: {}", self.length)?;
        writeln!(
            f,
            "available resolution for download: {}",
            self.resolutions.join(", ")
        )?;
        write!(
            f,
            "available audio quality for download: {}",
            self.audio_bitrates.join(", ")
        )
    }
}

/// Resolve the requested folder, falling back to `fallback` when it is unset,
/// invalid or cannot be created
fn choose_dir(requested: Option<PathBuf>, fallback: PathBuf) -> Result<PathBuf> {
    if let Some(requested) = requested {
        match requested.to_str() {
            Some(folder) => {
                if let Some(dir) = resolve_output_dir(folder) {
                    return Ok(dir);
                }
            }
            None => warn!(
                "{} is not valid UTF-8, downloading to {} instead",
                requested.display(),
                fallback.display()
            ),
        }
    }

    std::fs::create_dir_all(&fallback)?;
    Ok(fallback)
}

fn file_name(stem: &str, ext: &str) -> String {
    if ext.is_empty() {
        stem.to_string()
    } else {
        format!("{}.{}", stem, ext)
    }
}

async fn remove_partial(path: &Path) {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!("Failed to remove partial output {}: {}", path.display(), e);
        }
    }
}

/// File name for a thumbnail: the last path segment of its URL
pub fn thumbnail_file_name(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|segment| !segment.is_empty())
        .map(|segment| sanitize_title(&segment))
        .unwrap_or_else(|| DEFAULT_THUMBNAIL_NAME.to_string())
}
