//! Resolution and bitrate labels
//!
//! Resolution labels look like `1080p` or `1080p60`; bitrate labels look like
//! `128kbps`. Catalog labels only carry a frame rate when it exceeds 30.

use crate::utils::error::TubefetchError;
use std::fmt;
use std::str::FromStr;

/// Frame rates at or below this are not spelled out in labels
pub const FPS_LABEL_THRESHOLD: u32 = 30;

/// A video quality such as `720p` or `1080p60`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QualityLabel {
    pub height: u32,
    /// `None` means any frame rate
    pub fps: Option<u32>,
}

impl QualityLabel {
    pub fn new(height: u32, fps: Option<u32>) -> Self {
        Self { height, fps }
    }

    /// Label for a stream as it appears in the catalog
    pub fn for_stream(height: u32, fps: u32) -> Self {
        let fps = (fps > FPS_LABEL_THRESHOLD).then_some(fps);
        Self { height, fps }
    }

    /// The resolution part alone, e.g. `1080p`
    pub fn resolution(&self) -> String {
        format!("{}p", self.height)
    }

    /// Whether a stream with this height and frame rate satisfies the label
    pub fn matches(&self, height: u32, fps: u32) -> bool {
        self.height == height && self.fps.map_or(true, |wanted| wanted == fps)
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fps {
            Some(fps) => write!(f, "{}p{}", self.height, fps),
            None => write!(f, "{}p", self.height),
        }
    }
}

impl FromStr for QualityLabel {
    type Err = TubefetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            TubefetchError::InvalidQuality(format!(
                "'{}' should look like 1080p60 or 360p",
                s
            ))
        };

        let (height, fps) = s.trim().split_once('p').ok_or_else(invalid)?;
        if !is_digits(height) || !(fps.is_empty() || is_digits(fps)) {
            return Err(invalid());
        }

        let height = height.parse::<u32>().map_err(|_| invalid())?;
        let fps = if fps.is_empty() {
            None
        } else {
            Some(fps.parse::<u32>().map_err(|_| invalid())?)
        };

        if height == 0 || fps == Some(0) {
            return Err(invalid());
        }

        Ok(Self { height, fps })
    }
}

/// Render an audio bitrate label
pub fn bitrate_label(kbps: u32) -> String {
    format!("{}kbps", kbps)
}

/// Quality argument as typed by a user: a video label or a bare audio bitrate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityArg {
    Video(QualityLabel),
    Audio(u32),
}

impl FromStr for QualityArg {
    type Err = TubefetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains('p') {
            return s.parse().map(QualityArg::Video);
        }

        if !is_digits(s) {
            return Err(TubefetchError::InvalidQuality(format!(
                "'{}' should look like 1080p60/360p for video or 128 for audio",
                s
            )));
        }

        match s.parse::<u32>() {
            Ok(kbps) if kbps > 0 => Ok(QualityArg::Audio(kbps)),
            _ => Err(TubefetchError::InvalidQuality(format!(
                "audio bitrate '{}' should be a positive integer",
                s
            ))),
        }
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
