//! Stream catalog for one video
//!
//! Classifies the client's formats into progressive, video-only and audio-only
//! streams and answers the questions the orchestrator asks: which qualities
//! exist, which is best, and which stream satisfies a label.

use crate::catalog::label::{bitrate_label, QualityLabel};
use crate::extractor::models::Format;
use std::collections::HashSet;

/// Track layout of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Audio and video in one file
    Progressive,
    VideoOnly,
    AudioOnly,
}

impl StreamKind {
    /// Classify a format, `None` for formats without media tracks (storyboards)
    pub fn of(format: &Format) -> Option<Self> {
        match (format.has_video(), format.has_audio()) {
            (true, true) => Some(StreamKind::Progressive),
            (true, false) => Some(StreamKind::VideoOnly),
            (false, true) => Some(StreamKind::AudioOnly),
            (false, false) => None,
        }
    }

    pub fn has_video(self) -> bool {
        matches!(self, StreamKind::Progressive | StreamKind::VideoOnly)
    }
}

/// A classified format
#[derive(Debug, Clone)]
pub struct Stream {
    pub kind: StreamKind,
    pub format: Format,
}

impl Stream {
    pub fn height(&self) -> u32 {
        self.format.height.unwrap_or(0)
    }

    pub fn fps(&self) -> u32 {
        self.format.fps_rounded()
    }

    /// Label as listed in the catalog
    pub fn label(&self) -> QualityLabel {
        QualityLabel::for_stream(self.height(), self.fps())
    }
}

/// Streams of one video, in the order the client reported them
#[derive(Debug, Clone, Default)]
pub struct StreamCatalog {
    streams: Vec<Stream>,
}

impl StreamCatalog {
    pub fn from_formats(formats: &[Format]) -> Self {
        let streams = formats
            .iter()
            .filter_map(|format| {
                StreamKind::of(format).map(|kind| Stream {
                    kind,
                    format: format.clone(),
                })
            })
            .collect();

        Self { streams }
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Video-capable streams with a known height
    fn video_streams(&self) -> impl Iterator<Item = &Stream> {
        self.streams
            .iter()
            .filter(|s| s.kind.has_video() && s.height() > 0)
    }

    fn audio_streams(&self) -> impl Iterator<Item = &Stream> {
        self.streams
            .iter()
            .filter(|s| s.kind == StreamKind::AudioOnly)
    }

    /// Distinct video qualities, highest resolution first.
    ///
    /// Labels of equal height keep catalog order.
    pub fn video_labels(&self) -> Vec<QualityLabel> {
        let mut streams: Vec<&Stream> = self.video_streams().collect();
        streams.sort_by(|a, b| b.height().cmp(&a.height()));

        let mut seen = HashSet::new();
        streams
            .into_iter()
            .map(Stream::label)
            .filter(|label| seen.insert(*label))
            .collect()
    }

    /// Distinct audio bitrates in kbps, highest first
    pub fn audio_bitrates(&self) -> Vec<u32> {
        let mut bitrates: Vec<u32> = self
            .audio_streams()
            .map(|s| s.format.abr_rounded())
            .filter(|&kbps| kbps > 0)
            .collect();
        bitrates.sort_unstable_by(|a, b| b.cmp(a));
        bitrates.dedup();
        bitrates
    }

    /// Distinct audio bitrate labels (`128kbps`), highest first
    pub fn audio_labels(&self) -> Vec<String> {
        self.audio_bitrates().into_iter().map(bitrate_label).collect()
    }

    /// Highest resolution available, with the highest frame rate offered at
    /// that resolution. Scans every stream; catalog order does not matter.
    pub fn best_video_label(&self) -> Option<QualityLabel> {
        let best_height = self.video_streams().map(Stream::height).max()?;
        let best_fps = self
            .video_streams()
            .filter(|s| s.height() == best_height)
            .map(Stream::fps)
            .max()
            .unwrap_or(0);

        Some(QualityLabel::for_stream(best_height, best_fps))
    }

    /// Progressive stream satisfying `label`; the last match wins
    pub fn find_progressive(&self, label: &QualityLabel) -> Option<&Format> {
        self.find_video(StreamKind::Progressive, label)
    }

    /// Video-only stream satisfying `label`; the last match wins
    pub fn find_video_only(&self, label: &QualityLabel) -> Option<&Format> {
        self.find_video(StreamKind::VideoOnly, label)
    }

    fn find_video(&self, kind: StreamKind, label: &QualityLabel) -> Option<&Format> {
        self.streams
            .iter()
            .filter(|s| s.kind == kind && label.matches(s.height(), s.fps()))
            .last()
            .map(|s| &s.format)
    }

    /// Audio-only stream with the highest bitrate
    pub fn best_audio(&self) -> Option<&Format> {
        self.audio_streams()
            .max_by(|a, b| {
                let a = a.format.abr.unwrap_or(0.0);
                let b = b.format.abr.unwrap_or(0.0);
                a.total_cmp(&b)
            })
            .map(|s| &s.format)
    }

    /// Audio-only stream whose label is exactly `{kbps}kbps`
    pub fn find_audio(&self, kbps: u32) -> Option<&Format> {
        self.audio_streams()
            .filter(|s| s.format.abr_rounded() == kbps)
            .last()
            .map(|s| &s.format)
    }
}
