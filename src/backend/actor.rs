use super::messages::{BackendCommand, BackendEvent};
use crate::downloader::{DownloadRequest, Toolbox, VideoSource};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

/// Runs downloads in the background for interactive front ends.
///
/// Commands are handled in order. Each download runs on its own task and
/// reports back with exactly one `DownloadCompleted` or `DownloadFailed`.
pub struct BackendActor {
    receiver: mpsc::Receiver<BackendCommand>,
    sender: mpsc::Sender<BackendEvent>,

    // Components
    toolbox: Toolbox,
    source: Option<Arc<VideoSource>>,
}

impl BackendActor {
    pub fn new(
        toolbox: Toolbox,
        receiver: mpsc::Receiver<BackendCommand>,
        sender: mpsc::Sender<BackendEvent>,
    ) -> Self {
        Self {
            receiver,
            sender,
            toolbox,
            source: None,
        }
    }

    pub async fn run(mut self) {
        info!("BackendActor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                BackendCommand::Open { url } => {
                    self.handle_open(url).await;
                }
                BackendCommand::Download { request } => {
                    self.handle_download(request).await;
                }
                BackendCommand::FetchThumbnail { output_dir } => {
                    self.handle_fetch_thumbnail(output_dir).await;
                }
                BackendCommand::Shutdown => {
                    info!("BackendActor shutting down");
                    break;
                }
            }
        }
    }

    async fn handle_open(&mut self, url: String) {
        match VideoSource::open(&url, self.toolbox.clone()).await {
            Ok(source) => {
                let report = source.get_info();
                self.source = Some(Arc::new(source));
                let _ = self.sender.send(BackendEvent::Opened(Ok(report))).await;
            }
            Err(e) => {
                error!("Failed to open {}: {:#}", url, e);
                let _ = self
                    .sender
                    .send(BackendEvent::Opened(Err(format!("{:#}", e))))
                    .await;
            }
        }
    }

    async fn handle_download(&self, request: DownloadRequest) {
        let Some(source) = self.current_source().await else {
            return;
        };

        if let Err(e) = request.validate() {
            let _ = self.sender.send(BackendEvent::Error(e.to_string())).await;
            return;
        }

        let job_id = Uuid::new_v4().to_string();
        let _ = self
            .sender
            .send(BackendEvent::DownloadStarted {
                job_id: job_id.clone(),
                title: source.title().to_string(),
            })
            .await;

        let sender = self.sender.clone();
        tokio::spawn(async move {
            let event = match request.execute(&source).await {
                Ok(path) => {
                    info!("Job {} finished: {}", job_id, path.display());
                    BackendEvent::DownloadCompleted { job_id, path }
                }
                Err(e) => {
                    error!("Job {} failed: {:#}", job_id, e);
                    BackendEvent::DownloadFailed {
                        job_id,
                        error: format!("{:#}", e),
                    }
                }
            };
            let _ = sender.send(event).await;
        });
    }

    async fn handle_fetch_thumbnail(&self, output_dir: Option<PathBuf>) {
        let Some(source) = self.current_source().await else {
            return;
        };

        let sender = self.sender.clone();
        tokio::spawn(async move {
            let event = match source.get_thumbnail(output_dir.as_deref()).await {
                Ok(path) => BackendEvent::ThumbnailReady(path),
                Err(e) => BackendEvent::Error(format!("{:#}", e)),
            };
            let _ = sender.send(event).await;
        });
    }

    /// The opened video, reporting an error event when there is none
    async fn current_source(&self) -> Option<Arc<VideoSource>> {
        if self.source.is_none() {
            let _ = self
                .sender
                .send(BackendEvent::Error("No video opened".to_string()))
                .await;
        }
        self.source.clone()
    }
}
