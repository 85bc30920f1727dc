use crate::downloader::{DownloadRequest, VideoReport};
use std::path::PathBuf;

/// Commands sent from a front end to the backend
#[derive(Debug, Clone)]
pub enum BackendCommand {
    /// Open a video; later commands act on it
    Open {
        url: String,
    },
    Download {
        request: DownloadRequest,
    },
    FetchThumbnail {
        output_dir: Option<PathBuf>,
    },
    // System
    Shutdown,
}

/// Events sent from the backend to a front end
#[derive(Debug, Clone)]
pub enum BackendEvent {
    Opened(Result<VideoReport, String>),

    // Download life-cycle, one terminal event per job
    DownloadStarted {
        job_id: String,
        title: String,
    },
    DownloadCompleted {
        job_id: String,
        path: PathBuf,
    },
    DownloadFailed {
        job_id: String,
        error: String,
    },

    ThumbnailReady(PathBuf),

    // System
    Error(String),
}
