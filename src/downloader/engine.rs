//! Plain HTTP download engine
//!
//! Media streams go through the extractor; this engine fetches the small
//! side files (thumbnails) that are served as ordinary HTTP resources.

use crate::utils::error::TubefetchError;
use anyhow::Result;
use futures::StreamExt;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Download configuration
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub user_agent: String,
    pub connect_timeout: Duration, // Connection setup only; transfers are unbounded
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("tubefetch/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP download engine
pub struct DownloadEngine {
    client: Client,
}

impl DownloadEngine {
    /// Create new download engine with configuration
    pub fn new(config: DownloadConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Stream `url` into `output_path`, returning the number of bytes written.
    ///
    /// A partially written file is removed when the transfer fails.
    pub async fn fetch_to_file(&self, url: &str, output_path: &Path) -> Result<u64> {
        debug!("Fetching {} into {}", url, output_path.display());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(TubefetchError::from)?;
        if !response.status().is_success() {
            return Err(TubefetchError::DownloadError(format!(
                "HTTP error {} for {}",
                response.status(),
                url
            ))
            .into());
        }

        match Self::write_body(response, output_path).await {
            Ok(written) => {
                debug!("Wrote {} bytes to {}", written, output_path.display());
                Ok(written)
            }
            Err(e) => {
                if let Err(remove_err) = tokio::fs::remove_file(output_path).await {
                    warn!(
                        "Failed to remove partial file {}: {}",
                        output_path.display(),
                        remove_err
                    );
                }
                Err(e)
            }
        }
    }

    async fn write_body(response: reqwest::Response, output_path: &Path) -> Result<u64> {
        let mut file = File::create(output_path).await?;
        let mut written = 0u64;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(TubefetchError::from)?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        Ok(written)
    }
}
