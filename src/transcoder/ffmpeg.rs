//! ffmpeg subprocess driver

use crate::transcoder::Transcoder;
use crate::utils::error::TubefetchError;
use crate::utils::platform;
use anyhow::Result;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tokio::process::Command as AsyncCommand;
use tracing::{debug, error, info, warn};

/// Flags used when muxing separate video and audio downloads
const MUX_FLAGS: [&str; 6] = ["-acodec", "aac", "-vsync", "vfr", "-preset", "veryfast"];

pub struct FfmpegTranscoder {
    ffmpeg_path: PathBuf,
}

impl FfmpegTranscoder {
    /// Use a specific ffmpeg binary without probing it
    pub fn with_path(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    /// Locate ffmpeg and check that `ffmpeg -version` runs.
    ///
    /// Meant to be called once during start-up.
    pub fn probe(explicit: Option<&Path>) -> Option<Self> {
        let candidate = match explicit {
            Some(path) => path.to_path_buf(),
            None => platform::find_tool("ffmpeg")?,
        };

        let status = Command::new(&candidate)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => {
                info!("✓ ffmpeg found at: {}", candidate.display());
                Some(Self::with_path(candidate))
            }
            Ok(status) => {
                warn!(
                    "✗ {} -version exited with {:?}",
                    candidate.display(),
                    status.code()
                );
                None
            }
            Err(e) => {
                warn!("✗ ffmpeg not usable at {}: {}", candidate.display(), e);
                None
            }
        }
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }

    async fn run(&self, args: Vec<OsString>) -> Result<()> {
        debug!("Running {} {:?}", self.ffmpeg_path.display(), args);

        let output = AsyncCommand::new(&self.ffmpeg_path)
            .args(["-hide_banner", "-nostdin", "-loglevel", "error", "-y"])
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("ffmpeg failed: {}", stderr.trim());
            let message = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("ffmpeg exited with an error")
                .trim()
                .to_string();
            return Err(TubefetchError::TranscodeFailed(message).into());
        }

        Ok(())
    }
}

/// Arguments after the global flags for a mux
pub fn mux_args(video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-i".into(),
        video.into(),
        "-i".into(),
        audio.into(),
    ];
    args.extend(MUX_FLAGS.iter().map(OsString::from));
    args.push(output.into());
    args
}

/// Arguments after the global flags for a conversion
pub fn convert_args(input: &Path, output: &Path) -> Vec<OsString> {
    vec!["-i".into(), input.into(), output.into()]
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<()> {
        info!("Muxing into {}", output.display());
        self.run(mux_args(video, audio, output)).await
    }

    async fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        info!("Converting {} to {}", input.display(), output.display());
        self.run(convert_args(input, output)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mux_args() {
        let args = mux_args(
            Path::new("v.tmp"),
            Path::new("a.tmp"),
            Path::new("out.mp4"),
        );
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec![
                "-i", "v.tmp", "-i", "a.tmp", "-acodec", "aac", "-vsync", "vfr", "-preset",
                "veryfast", "out.mp4"
            ]
        );
    }

    #[test]
    fn test_convert_args() {
        let args = convert_args(Path::new("song.webm"), Path::new("song.mp3"));
        assert_eq!(args, vec![OsString::from("-i"), "song.webm".into(), "song.mp3".into()]);
    }

    #[test]
    fn test_probe_missing_binary() {
        assert!(FfmpegTranscoder::probe(Some(Path::new("/no/such/ffmpeg"))).is_none());
    }

    #[cfg(unix)]
    mod with_fake_binary {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn fake_ffmpeg(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("ffmpeg");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn test_probe_accepts_working_binary() {
            let temp = TempDir::new().unwrap();
            let script = fake_ffmpeg(temp.path(), "exit 0");
            let probed = FfmpegTranscoder::probe(Some(&script)).expect("probe");
            assert_eq!(probed.ffmpeg_path(), script.as_path());
        }

        #[test]
        fn test_probe_rejects_failing_binary() {
            let temp = TempDir::new().unwrap();
            let script = fake_ffmpeg(temp.path(), "exit 3");
            assert!(FfmpegTranscoder::probe(Some(&script)).is_none());
        }

        #[tokio::test]
        async fn test_convert_writes_last_argument() {
            let temp = TempDir::new().unwrap();
            let script = fake_ffmpeg(
                temp.path(),
                r#"for last; do :; done
printf 'converted' > "$last""#,
            );

            let transcoder = FfmpegTranscoder::with_path(script);
            let output = temp.path().join("song.mp3");
            transcoder
                .convert(&temp.path().join("song.webm"), &output)
                .await
                .unwrap();
            assert_eq!(std::fs::read_to_string(&output).unwrap(), "converted");
        }

        #[tokio::test]
        async fn test_failure_is_transcode_failed() {
            let temp = TempDir::new().unwrap();
            let script = fake_ffmpeg(temp.path(), "echo 'Invalid data found' >&2\nexit 1");

            let transcoder = FfmpegTranscoder::with_path(script);
            let err = transcoder
                .mux(Path::new("v"), Path::new("a"), &temp.path().join("o.mp4"))
                .await
                .unwrap_err();

            match TubefetchError::find(&err) {
                Some(TubefetchError::TranscodeFailed(msg)) => {
                    assert_eq!(msg, "Invalid data found")
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }
}
