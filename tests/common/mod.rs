//! Test doubles for the external tools, shared by the integration tests.
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tubefetch::downloader::{DownloadConfig, DownloadEngine, Toolbox};
use tubefetch::extractor::{Extractor, Format, VideoInfo};
use tubefetch::transcoder::Transcoder;
use tubefetch::utils::{TempFilePolicy, TubefetchError};

pub fn video_only(id: &str, height: u32, fps: f32) -> Format {
    Format {
        format_id: id.to_string(),
        ext: "mp4".to_string(),
        height: Some(height),
        fps: Some(fps),
        vcodec: Some("avc1.640028".to_string()),
        acodec: Some("none".to_string()),
        ..Default::default()
    }
}

pub fn progressive(id: &str, height: u32, fps: f32) -> Format {
    Format {
        acodec: Some("mp4a.40.2".to_string()),
        ..video_only(id, height, fps)
    }
}

pub fn audio_only(id: &str, ext: &str, abr: f32) -> Format {
    Format {
        format_id: id.to_string(),
        ext: ext.to_string(),
        abr: Some(abr),
        vcodec: Some("none".to_string()),
        acodec: Some("opus".to_string()),
        ..Default::default()
    }
}

/// 360p progressive, 720p/720p60/1080p video-only, two audio streams
pub fn sample_video() -> VideoInfo {
    VideoInfo {
        id: "abc123".to_string(),
        title: "Rust: Fearless/Concurrency?".to_string(),
        url: "https://www.youtube.com/watch?v=abc123".to_string(),
        duration: Some(3725.0),
        thumbnail: Some("https://i.ytimg.com/vi/abc123/hqdefault.jpg".to_string()),
        uploader: Some("Ferris".to_string()),
        upload_date: Some("20240115".to_string()),
        description: Some("Talk about threads".to_string()),
        formats: vec![
            progressive("18", 360, 30.0),
            video_only("136", 720, 30.0),
            video_only("298", 720, 60.0),
            video_only("137", 1080, 30.0),
            audio_only("139", "m4a", 48.7),
            audio_only("251", "webm", 129.6),
        ],
    }
}

/// Extractor that serves canned metadata and writes the format id into each
/// downloaded file
pub struct FakeExtractor {
    info: Option<VideoInfo>,
    missing_binary: bool,
    downloads: AtomicUsize,
    downloaded: Mutex<Vec<String>>,
}

impl FakeExtractor {
    pub fn new(info: VideoInfo) -> Self {
        Self {
            info: Some(info),
            missing_binary: false,
            downloads: AtomicUsize::new(0),
            downloaded: Mutex::new(Vec::new()),
        }
    }

    /// Every lookup fails like a private video
    pub fn unavailable() -> Self {
        Self {
            info: None,
            ..Self::new(sample_video())
        }
    }

    /// Every lookup fails to start the tool at all
    pub fn missing_binary() -> Self {
        Self {
            missing_binary: true,
            ..Self::new(sample_video())
        }
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    pub fn downloaded_ids(&self) -> Vec<String> {
        self.downloaded.lock().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    fn id(&self) -> &'static str {
        "fake"
    }

    async fn extract_info(&self, _url: &str) -> Result<VideoInfo> {
        if self.missing_binary {
            let spawn = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory");
            return Err(anyhow::Error::from(spawn).context("Failed to run yt-dlp"));
        }
        self.info
            .clone()
            .ok_or_else(|| TubefetchError::VideoUnavailable("Private video".to_string()).into())
    }

    async fn download_format(&self, _url: &str, format: &Format, output: &Path) -> Result<()> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        self.downloaded
            .lock()
            .unwrap()
            .push(format.format_id.clone());
        tokio::fs::write(output, format.format_id.as_bytes()).await?;
        Ok(())
    }
}

/// Transcoder that concatenates its inputs, or fails on demand
pub struct FakeTranscoder {
    fail: bool,
    pub muxed_inputs: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl FakeTranscoder {
    pub fn working() -> Self {
        Self {
            fail: false,
            muxed_inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            muxed_inputs: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<()> {
        self.muxed_inputs
            .lock()
            .unwrap()
            .push((video.to_path_buf(), audio.to_path_buf()));

        // Partial output, as a crashed ffmpeg would leave behind
        let mut bytes = tokio::fs::read(video).await?;
        if self.fail {
            tokio::fs::write(output, b"partial").await?;
            return Err(TubefetchError::TranscodeFailed("Conversion failed!".to_string()).into());
        }
        bytes.extend(tokio::fs::read(audio).await?);
        tokio::fs::write(output, bytes).await?;
        Ok(())
    }

    async fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        if self.fail {
            tokio::fs::write(output, b"partial").await?;
            return Err(TubefetchError::TranscodeFailed("Conversion failed!".to_string()).into());
        }
        tokio::fs::copy(input, output).await?;
        Ok(())
    }
}

pub fn toolbox(
    extractor: Arc<FakeExtractor>,
    transcoder: Option<Arc<FakeTranscoder>>,
    temp_policy: TempFilePolicy,
) -> Toolbox {
    Toolbox {
        extractor,
        transcoder: transcoder.map(|t| t as Arc<dyn Transcoder>),
        engine: Arc::new(DownloadEngine::new(DownloadConfig::default()).unwrap()),
        temp_policy,
        download_dir: std::env::temp_dir().join("tubefetch-tests"),
    }
}

/// Serve `body` to the first client on a local port and return its URL for `path`
pub async fn serve_once(path: &str, body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: image/jpeg\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = socket.write_all(header.as_bytes()).await;
            let _ = socket.write_all(body).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}{}", addr, path)
}

/// Names of all entries in `dir`, sorted
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
