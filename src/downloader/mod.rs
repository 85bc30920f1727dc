//! Download orchestration and transfer

pub mod artifacts;
pub mod engine;
pub mod orchestrator;
pub mod request;

pub use engine::{DownloadConfig, DownloadEngine};
pub use orchestrator::{Toolbox, VideoReport, VideoSource};
pub use request::{AudioFormat, DownloadMode, DownloadRequest};
