//! Scoped intermediate files
//!
//! Muxing needs the video and audio tracks on disk before ffmpeg runs. Each
//! download reserves uniquely named files here and hands the guard back when
//! it is done; whatever happens in between, the files are removed, or kept for
//! recovery when the policy asks for it and the download failed.

use crate::utils::config::TempFilePolicy;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tracing::{debug, warn};

pub struct ScratchFiles {
    paths: Vec<TempPath>,
    policy: TempFilePolicy,
    succeeded: bool,
}

impl ScratchFiles {
    pub fn new(policy: TempFilePolicy) -> Self {
        Self {
            paths: Vec::new(),
            policy,
            succeeded: false,
        }
    }

    /// Reserve a fresh, empty file in `dir`, named after `role` and ending in `.{ext}`
    pub fn reserve(&mut self, dir: &Path, role: &str, ext: &str) -> Result<PathBuf> {
        let prefix = format!(".tubefetch-{}-", role);
        let suffix = if ext.is_empty() {
            String::new()
        } else {
            format!(".{}", ext)
        };

        let path = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile_in(dir)?
            .into_temp_path();

        let reserved = path.to_path_buf();
        debug!("Reserved intermediate file {}", reserved.display());
        self.paths.push(path);
        Ok(reserved)
    }

    /// Mark the download as successful; the files are removed on drop
    pub fn succeed(mut self) {
        self.succeeded = true;
    }
}

impl Drop for ScratchFiles {
    fn drop(&mut self) {
        if self.succeeded || !self.policy.keeps_on_failure() {
            return;
        }

        for path in self.paths.drain(..) {
            match path.keep() {
                Ok(kept) => warn!("Kept intermediate file for recovery: {}", kept.display()),
                Err(e) => warn!("Failed to keep intermediate file: {}", e),
            }
        }
    }
}
