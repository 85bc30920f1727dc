//! tubefetch - download videos and audio from the command line
//!
//! Shows video info or downloads one video/audio stream, muxing or converting
//! with ffmpeg when the requested quality needs it.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;
use tubefetch::downloader::{AudioFormat, DownloadRequest, Toolbox, VideoSource};
use tubefetch::utils::{self, AppSettings};
use tubefetch::QualityArg;

#[derive(Parser)]
#[command(version, about = "Download a video or its audio track")]
struct Args {
    /// url of video
    url: String,

    /// folder for saving downloaded video and audio
    #[arg(long, short = 'f')]
    folder: Option<String>,

    /// quality of video/audio, must be in the format of 1080p60/360p (for video) or 128 (for audio)
    #[arg(long, short = 'q')]
    quality: Option<String>,

    /// show video info
    #[arg(long, short = 'i')]
    info: bool,

    /// download audio only
    #[arg(long, short = 'a')]
    audio: bool,

    /// choose audio format
    #[arg(long, value_enum)]
    aformat: Option<AudioFormat>,
}

impl Args {
    /// Build the download request, validating quality against the mode.
    /// `None` in info mode, where quality and folder are ignored.
    fn request(&self) -> Result<Option<DownloadRequest>, utils::TubefetchError> {
        if self.info {
            return Ok(None);
        }

        let quality = self
            .quality
            .as_deref()
            .map(str::parse::<QualityArg>)
            .transpose()?;
        let output_dir = self.folder.as_deref().map(PathBuf::from);

        let request = if self.audio {
            let bitrate = match quality {
                Some(QualityArg::Audio(kbps)) => Some(kbps),
                Some(QualityArg::Video(label)) => {
                    return Err(utils::TubefetchError::InvalidQuality(format!(
                        "{} is a video resolution, audio quality must be a bitrate like 128",
                        label
                    )))
                }
                None => None,
            };
            DownloadRequest::audio(bitrate, output_dir, self.aformat)
        } else {
            DownloadRequest {
                quality,
                ..DownloadRequest::video(None, output_dir)
            }
        };

        request.validate()?;
        Ok(Some(request))
    }
}

/// Locate the tools and load settings, before any runtime exists.
/// Downloads without a usable `-f` folder go to the current directory.
fn prepare_toolbox() -> Result<Toolbox> {
    let settings = AppSettings::load_or_default();
    let mut toolbox = Toolbox::from_settings(&settings)?;

    match std::env::current_dir() {
        Ok(cwd) => toolbox.download_dir = cwd,
        Err(e) => warn!(
            "Cannot read current directory ({}), using {}",
            e,
            toolbox.download_dir.display()
        ),
    }
    Ok(toolbox)
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let request = match args.request() {
        Ok(request) => request,
        Err(e) => {
            eprintln!("[ERROR: {}]", e);
            let _ = Args::command().print_help();
            return ExitCode::from(2);
        }
    };

    let toolbox = match prepare_toolbox() {
        Ok(toolbox) => toolbox,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(&args.url, toolbox, request)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(url: &str, toolbox: Toolbox, request: Option<DownloadRequest>) -> Result<()> {
    let source = VideoSource::open(url, toolbox).await?;

    let Some(request) = request else {
        println!("{}", source.get_info());
        return Ok(());
    };

    let path = request.execute(&source).await?;
    println!("Downloaded to {}", path.display());
    Ok(())
}
