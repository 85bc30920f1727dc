//! Data structures for video information

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Video information structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    #[serde(rename = "webpage_url", default)]
    pub url: String,
    #[serde(default)]
    pub duration: Option<f64>,
    pub thumbnail: Option<String>,
    pub uploader: Option<String>,
    pub upload_date: Option<String>, // YYYYMMDD
    pub description: Option<String>,
    #[serde(default)]
    pub formats: Vec<Format>,
}

impl VideoInfo {
    /// Duration in whole seconds
    pub fn length(&self) -> u64 {
        self.duration.map(|d| d.max(0.0).round() as u64).unwrap_or(0)
    }

    /// Publish date parsed from yt-dlp's `YYYYMMDD` form
    pub fn publish_date(&self) -> Option<NaiveDate> {
        self.upload_date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y%m%d").ok())
    }
}

/// Video format information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Format {
    pub format_id: String,
    #[serde(default)]
    pub ext: String,
    #[serde(default)]
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
    pub fps: Option<f32>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    pub abr: Option<f32>, // Audio bitrate, kbps
    pub tbr: Option<f32>, // Total bitrate, kbps
    pub format_note: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
}

impl Format {
    /// Carries a video track
    pub fn has_video(&self) -> bool {
        match self.vcodec.as_deref() {
            Some(codec) => codec != "none",
            None => self.height.is_some(),
        }
    }

    /// Carries an audio track
    pub fn has_audio(&self) -> bool {
        match self.acodec.as_deref() {
            Some(codec) => codec != "none",
            None => self.abr.is_some(),
        }
    }

    /// Frame rate as a whole number, 0 when unknown
    pub fn fps_rounded(&self) -> u32 {
        self.fps.map(|fps| fps.max(0.0).round() as u32).unwrap_or(0)
    }

    /// Audio bitrate in whole kbps, 0 when unknown
    pub fn abr_rounded(&self) -> u32 {
        self.abr.map(|abr| abr.max(0.0).round() as u32).unwrap_or(0)
    }
}
